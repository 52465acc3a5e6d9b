use crate::url::normalize::normalize_link;
use crate::UrlError;
use url::Url;

/// The scope of one crawl, derived once from its seed URL
///
/// `domain` is the seed's netloc (host plus any explicit port) and `base_path`
/// is the seed's path. Both stay fixed for the whole job and drive every
/// scope decision the link classifier makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    /// The seed as submitted
    pub seed_url: String,

    /// Seed's netloc, e.g. `example.com` or `127.0.0.1:8080`
    pub domain: String,

    /// Path prefix every in-scope link must share
    pub base_path: String,

    /// Scheme used to resolve root-relative links
    pub scheme: String,
}

impl CrawlJob {
    /// Derives the job scope from a seed URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_harvest::url::CrawlJob;
    ///
    /// let job = CrawlJob::from_seed("https://example.com/docs").unwrap();
    /// assert_eq!(job.domain, "example.com");
    /// assert_eq!(job.base_path, "/docs");
    /// ```
    pub fn from_seed(seed: &str) -> Result<Self, UrlError> {
        let seed = seed.trim();
        let url = Url::parse(seed).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(UrlError::InvalidScheme(other.to_string())),
        }

        let domain = netloc(&url).ok_or(UrlError::MissingDomain)?;

        Ok(Self {
            seed_url: seed.to_string(),
            domain,
            base_path: url.path().to_string(),
            scheme: url.scheme().to_string(),
        })
    }

    /// The frontier key for the seed itself
    pub fn seed_key(&self) -> String {
        normalize_link(&self.seed_url)
    }

    /// `scheme://domain`, the base for root-relative links
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.domain)
    }
}

/// Returns the netloc (lowercase host plus explicit port) of a URL
///
/// Default ports are dropped by the URL parser, so `https://a.com:443/`
/// and `https://a.com/` share the netloc `a.com`.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Returns `scheme://netloc` for a URL, the form external links are recorded in
pub fn origin_of(url: &Url) -> Option<String> {
    netloc(url).map(|n| format!("{}://{}", url.scheme(), n))
}
