//! Filesystem output
//!
//! Layout under the data directory:
//!
//! ```text
//! <data-dir>/text/<domain>/<sha256(url)>.txt
//! <data-dir>/external-links/<domain>_external_links.txt
//! ```

use crate::output::traits::{OutputResult, PageSink};
use crate::url::url_hash;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const TEXT_DIR: &str = "text";
const EXTERNAL_LINKS_DIR: &str = "external-links";

/// Writes crawl results as plain UTF-8 text files
#[derive(Debug, Clone)]
pub struct FileOutput {
    data_dir: PathBuf,
}

impl FileOutput {
    /// Creates an output rooted at `data_dir`
    ///
    /// Directories are created lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The root directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding one domain's page files
    pub fn domain_text_dir(&self, domain: &str) -> PathBuf {
        self.data_dir.join(TEXT_DIR).join(dir_name(domain))
    }

    /// Path of the file a page URL is stored under
    pub fn page_path(&self, domain: &str, url: &str) -> PathBuf {
        self.domain_text_dir(domain)
            .join(format!("{}.txt", url_hash(url)))
    }

    /// Path of a domain's external-link list
    pub fn external_links_path(&self, domain: &str) -> PathBuf {
        self.data_dir
            .join(EXTERNAL_LINKS_DIR)
            .join(format!("{}_external_links.txt", dir_name(domain)))
    }
}

impl PageSink for FileOutput {
    fn write_page(&self, domain: &str, url: &str, text: &str) -> OutputResult<PathBuf> {
        fs::create_dir_all(self.domain_text_dir(domain))?;

        let path = self.page_path(domain, url);
        fs::write(&path, text)?;

        tracing::debug!("Wrote {} bytes for {} to {}", text.len(), url, path.display());
        Ok(path)
    }

    fn write_external_links(
        &self,
        domain: &str,
        links: &HashSet<String>,
    ) -> OutputResult<PathBuf> {
        let path = self.external_links_path(domain);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        for link in links {
            content.push_str(link);
            content.push('\n');
        }
        fs::write(&path, content)?;

        tracing::debug!("Wrote {} external links to {}", links.len(), path.display());
        Ok(path)
    }
}

/// Makes a netloc safe to use as a path component (`host:port` → `host_port`)
fn dir_name(domain: &str) -> String {
    domain.replace(':', "_")
}
