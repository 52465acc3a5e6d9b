//! URL handling module for Site-Harvest
//!
//! This module provides crawl scope derivation, link classification,
//! frontier-key normalization, and the stable URL hash used for file names.

mod domain;
mod matcher;
mod normalize;

use std::collections::HashSet;
use url::Url;

// Re-export main functions
pub use domain::{netloc, origin_of, CrawlJob};
pub use matcher::{has_image_suffix, is_absolute_http, within_base_path};
pub use normalize::{normalize_link, url_hash};

/// Outcome of classifying one raw href against a job's scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// Dropped: images, fragments, mailto, unsupported relative forms
    Ignore,
    /// Out of scope, recorded by its `scheme://netloc`
    External(String),
    /// In scope, carrying the normalized frontier key
    InScope(String),
}

/// Classifies a raw hyperlink against the job's domain and base path
///
/// Rules are applied in order:
/// 1. Image suffix (`.png .jpg .jpeg .gif .svg`) → `Ignore`
/// 2. Absolute `http(s)://` link:
///    - other netloc → `External(scheme://netloc)`
///    - same netloc, path under the base path → `InScope(href)`
///    - same netloc, path outside the base path → `Ignore`
/// 3. Root-relative (`/…`) under the base path → `InScope` resolved against
///    the job origin; any other root-relative link → `Ignore`
/// 4. `#…` and `mailto:` → `Ignore`
/// 5. Everything else → `Ignore`
///
/// `InScope` values have a single trailing `/` stripped.
///
/// # Examples
///
/// ```
/// use site_harvest::url::{classify_link, CrawlJob, LinkClass};
///
/// let job = CrawlJob::from_seed("https://example.com/docs").unwrap();
///
/// assert_eq!(
///     classify_link("https://example.com/docs/a/", &job),
///     LinkClass::InScope("https://example.com/docs/a".to_string())
/// );
/// assert_eq!(
///     classify_link("https://other.org/x", &job),
///     LinkClass::External("https://other.org".to_string())
/// );
/// assert_eq!(classify_link("mailto:me@example.com", &job), LinkClass::Ignore);
/// ```
pub fn classify_link(href: &str, job: &CrawlJob) -> LinkClass {
    let href = href.trim();

    if has_image_suffix(href) {
        return LinkClass::Ignore;
    }

    if is_absolute_http(href) {
        let Ok(url) = Url::parse(href) else {
            return LinkClass::Ignore;
        };
        return classify_resolved(&url, href, job);
    }

    if href.starts_with('/') {
        if !within_base_path(href, &job.base_path) {
            return LinkClass::Ignore;
        }
        let resolved = match Url::parse(&job.origin()).and_then(|origin| origin.join(href)) {
            Ok(url) => url,
            Err(_) => return LinkClass::Ignore,
        };
        // `//host/path` resolves to another host
        return classify_resolved(&resolved, resolved.as_str(), job);
    }

    LinkClass::Ignore
}

fn classify_resolved(url: &Url, link: &str, job: &CrawlJob) -> LinkClass {
    let Some(link_netloc) = netloc(url) else {
        return LinkClass::Ignore;
    };

    if link_netloc != job.domain {
        return origin_of(url)
            .map(LinkClass::External)
            .unwrap_or(LinkClass::Ignore);
    }

    if within_base_path(url.path(), &job.base_path) {
        LinkClass::InScope(normalize_link(link))
    } else {
        LinkClass::Ignore
    }
}

/// Links from one page, deduplicated and split by class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    /// Normalized in-scope links, in first-seen order
    pub in_scope: Vec<String>,

    /// External origins, in first-seen order
    pub external: Vec<String>,
}

/// Classifies every link discovered on one page
///
/// Raw hrefs are deduplicated before classification and the results are
/// deduplicated again, so `…/a` and `…/a/` on one page yield a single entry.
pub fn classify_links<'a, I>(hrefs: I, job: &CrawlJob) -> ClassifiedLinks
where
    I: IntoIterator<Item = &'a str>,
{
    let mut raw_seen = HashSet::new();
    let mut class_seen = HashSet::new();
    let mut classified = ClassifiedLinks::default();

    for href in hrefs {
        if !raw_seen.insert(href) {
            continue;
        }

        let class = classify_link(href, job);
        if !class_seen.insert(class.clone()) {
            continue;
        }

        match class {
            LinkClass::InScope(link) => classified.in_scope.push(link),
            LinkClass::External(origin) => classified.external.push(origin),
            LinkClass::Ignore => tracing::trace!("Ignoring link {}", href),
        }
    }

    classified
}
