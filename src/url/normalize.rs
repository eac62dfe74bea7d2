use url::Url;

/// Scheme prefix added to input URLs that do not carry one
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Schemes the fetcher is able to request
const FETCHABLE_SCHEMES: &[&str] = &["http", "https"];

/// Ensures an input URL carries a scheme
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. If the text does not start with `<scheme>://`, prefix `http://`
///
/// The URL is otherwise left exactly as written.
///
/// # Arguments
///
/// * `raw` - The URL as read from the input file
///
/// # Examples
///
/// ```
/// use topic_sieve::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "http://example.com");
/// assert_eq!(ensure_scheme("https://example.com/a"), "https://example.com/a");
/// assert_eq!(ensure_scheme("bad://"), "bad://");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();

    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
    }
}

/// Returns true if the text starts with `<scheme>://`
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`.
/// `host:port` forms such as `example.com:8080/page` are not schemes because
/// the colon is not followed by `//`.
pub fn has_scheme(text: &str) -> bool {
    let Some((scheme, _)) = text.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}

/// Parses a URL and checks that the fetcher can request it
///
/// # Returns
///
/// * `Ok(Url)` - A parsed HTTP or HTTPS URL with a host
/// * `Err(String)` - Why the URL cannot be fetched
pub fn parse_fetchable(url_str: &str) -> Result<Url, String> {
    let url = Url::parse(url_str).map_err(|e| format!("invalid URL '{}': {}", url_str, e))?;

    if !FETCHABLE_SCHEMES.contains(&url.scheme()) {
        return Err(format!(
            "unsupported URL scheme '{}' in '{}'",
            url.scheme(),
            url_str
        ));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("missing host in '{}'", url_str));
    }

    Ok(url)
}
