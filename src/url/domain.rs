use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is not part of the domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use scrappy::url::extract_domain;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses a URL string, requiring it to have a host
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The string is not a URL, or it has no host
pub fn parse_page_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url_str.to_string()));
    }

    Ok(url)
}

/// Checks whether a URL string points at the given domain
///
/// Unparsable or hostless URLs are never in scope.
pub fn is_same_domain(url_str: &str, domain: &str) -> bool {
    parse_page_url(url_str)
        .ok()
        .and_then(|url| extract_domain(&url))
        .is_some_and(|host| host == domain)
}
