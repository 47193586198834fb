//! Long-URL normalization for cache keying and upstream calls.
//!
//! Equivalent spellings of the same content URL must map to one cache entry,
//! otherwise every variant would spend provider quota on its own.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Query parameters that only carry campaign attribution.
const TRACKING_PARAM_PREFIXES: &[&str] = &["utm_"];
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_cid", "mc_eid", "ref"];

/// Normalizes a long URL to its canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: only HTTP and HTTPS are accepted
/// 2. **Hostname**: lowercased by the parser
/// 3. **Default ports**: dropped (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: removed
/// 5. **Tracking parameters**: `utm_*`, `fbclid`, `gclid`, `mc_cid`, `mc_eid`, `ref` removed;
///    the remaining query is kept in its original order
/// 6. **Path**: preserved with case sensitivity
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs,
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes and
/// [`UrlNormalizationError::MissingHost`] for URLs without a host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://Example.com:443/blog/post?utm_source=x#top").unwrap(),
///     "https://example.com/blog/post"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    url.set_fragment(None);

    // The parser already drops default ports; explicit ones are kept.

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else if url.query_pairs().count() != kept.len() {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    Ok(url.to_string())
}

fn is_tracking_param(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    TRACKING_PARAMS.contains(&name.as_str())
        || TRACKING_PARAM_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}
