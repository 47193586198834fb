//! Canonical long URLs for content items.

use url::Url;

use crate::utils::url_normalizer::UrlNormalizationError;

/// Builds canonical content URLs such as `https://example.com/blog/{identifier}`.
#[derive(Debug, Clone)]
pub struct ContentUrlBuilder {
    base: Url,
    path_prefix: String,
}

impl ContentUrlBuilder {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, path_prefix: &str) -> Result<Self, UrlNormalizationError> {
        let base = Url::parse(base_url)
            .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(UrlNormalizationError::UnsupportedProtocol);
        }

        Ok(Self {
            base,
            path_prefix: path_prefix.trim_matches('/').to_string(),
        })
    }

    /// Canonical URL for an identifier; `None` for an empty identifier.
    ///
    /// The identifier is percent-encoded as a single path segment, so it can
    /// never escape the content prefix.
    pub fn canonical_url(&self, identifier: &str) -> Option<String> {
        let identifier = identifier.trim().trim_matches('/');
        if identifier.is_empty() {
            return None;
        }

        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty();
            if !self.path_prefix.is_empty() {
                segments.extend(self.path_prefix.split('/'));
            }
            segments.push(identifier);
        }

        Some(url.to_string())
    }
}
