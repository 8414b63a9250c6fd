use crate::url::domain::{extract_domain, parse_page_url};

/// Normalizes a URL into the key used for dedup and result storage
///
/// # Normalization Rules
///
/// 1. Parse the URL; reject if malformed or hostless
/// 2. Drop the scheme and the port
/// 3. Lowercase the host
/// 4. Drop the query string and the fragment
/// 5. Keep the path literally, trailing slash included; a URL written
///    without any path contributes nothing after the host
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Some(String)` - The `host + path` key
/// * `None` - The URL cannot be fetched
///
/// # Examples
///
/// ```
/// use scrappy::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://blog.boot.dev:8000/path?key=value#section"),
///     Some("blog.boot.dev/path".to_string())
/// );
/// assert_eq!(normalize_url("https://blog.boot.dev"), Some("blog.boot.dev".to_string()));
/// assert_eq!(normalize_url("not a url"), None);
/// ```
pub fn normalize_url(url_str: &str) -> Option<String> {
    let url = parse_page_url(url_str.trim()).ok()?;
    let host = extract_domain(&url)?;

    // The url crate reports "/" for an absent path; the key must not.
    let path = if url.path() == "/" && !has_explicit_path(url_str.trim()) {
        ""
    } else {
        url.path()
    };

    Some(format!("{}{}", host, path))
}

/// Checks whether the raw URL text carries a path after its authority
fn has_explicit_path(url_str: &str) -> bool {
    let rest = match url_str.split_once("://") {
        Some((_, rest)) => rest,
        None => return true,
    };

    let authority_end = rest
        .find(|c: char| c == '/' || c == '?' || c == '#')
        .unwrap_or(rest.len());

    rest[authority_end..].starts_with('/')
}
