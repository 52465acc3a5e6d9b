/// File suffixes that are never worth fetching for text
const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg"];

/// Checks if a link points at an image
///
/// The comparison is case-insensitive, so `PHOTO.JPG` counts as well.
///
/// # Examples
///
/// ```
/// use site_harvest::url::has_image_suffix;
///
/// assert!(has_image_suffix("https://example.com/images/pic.png"));
/// assert!(has_image_suffix("/logo.SVG"));
/// assert!(!has_image_suffix("https://example.com/report.pdf"));
/// ```
pub fn has_image_suffix(link: &str) -> bool {
    let lower = link.to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Checks if a link is written in absolute `http://` or `https://` form
///
/// Scheme letters are matched case-sensitively and at least one character
/// must follow the `://`.
pub fn is_absolute_http(link: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|prefix| link.len() > prefix.len() && link.starts_with(prefix))
}

/// Checks if a path lies under the job's base path
///
/// This is a plain string-prefix test: with base path `/docs`, both
/// `/docs/a` and `/docsearch` are in scope.
pub fn within_base_path(path: &str, base_path: &str) -> bool {
    path.starts_with(base_path)
}
