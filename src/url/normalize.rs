use sha2::{Digest, Sha256};

/// Normalizes an in-scope link into its frontier key
///
/// Only a single trailing slash is removed, so `…/page` and `…/page/` share
/// one visited entry. Nothing else about the link is rewritten.
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_link;
///
/// assert_eq!(normalize_link("https://example.com/docs/"), "https://example.com/docs");
/// assert_eq!(normalize_link("https://example.com/docs"), "https://example.com/docs");
/// ```
pub fn normalize_link(link: &str) -> String {
    link.strip_suffix('/').unwrap_or(link).to_string()
}

/// Computes the stable file key for a page URL
///
/// Lowercase hex SHA-256 of the URL string exactly as it was fetched.
/// Re-crawling the same URL therefore overwrites the same file.
pub fn url_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
