//! Structured cache key for shorten results.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::domain::entities::ShortenOptions;

/// Identity of a shorten request.
///
/// Two requests share a cache entry exactly when their normalized long URL,
/// requested domain and requested alias are all equal. Equality and hashing
/// are structural; [`CacheKey::digest`] provides a stable string form for
/// external stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    long_url: String,
    domain: Option<String>,
    alias: Option<String>,
}

impl CacheKey {
    /// Builds a key from an already normalized long URL and request options.
    ///
    /// Empty option strings are treated as absent so that `""` and `None`
    /// address the same entry.
    pub fn new(long_url: impl Into<String>, options: &ShortenOptions) -> Self {
        Self {
            long_url: long_url.into(),
            domain: non_empty(options.domain.as_deref()),
            alias: non_empty(options.alias.as_deref()),
        }
    }

    pub fn long_url(&self) -> &str {
        &self.long_url
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// SHA-256 hex digest over a length-prefixed encoding of all fields.
    ///
    /// Length prefixes keep `("ab", "c")` and `("a", "bc")` apart.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for field in [
            Some(self.long_url.as_str()),
            self.domain.as_deref(),
            self.alias.as_deref(),
        ] {
            match field {
                Some(value) => {
                    hasher.update([1u8]);
                    hasher.update((value.len() as u64).to_be_bytes());
                    hasher.update(value.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.long_url)?;
        if let Some(domain) = &self.domain {
            write!(f, " domain={}", domain)?;
        }
        if let Some(alias) = &self.alias {
            write!(f, " alias={}", alias)?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn options(domain: Option<&str>, alias: Option<&str>) -> ShortenOptions {
        ShortenOptions {
            domain: domain.map(str::to_string),
            alias: alias.map(str::to_string),
        }
    }

    #[test]
    fn test_equal_inputs_give_equal_keys() {
        let a = CacheKey::new("https://e.com/blog/a", &options(Some("tinyurl.com"), None));
        let b = CacheKey::new("https://e.com/blog/a", &options(Some("tinyurl.com"), None));

        assert_eq!(a, b);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_options_distinguish_keys() {
        let url = "https://e.com/blog/a";
        let keys: HashSet<CacheKey> = [
            CacheKey::new(url, &options(None, None)),
            CacheKey::new(url, &options(Some("tinyurl.com"), None)),
            CacheKey::new(url, &options(None, Some("blog-a"))),
            CacheKey::new(url, &options(Some("tinyurl.com"), Some("blog-a"))),
        ]
        .into_iter()
        .collect();

        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_empty_options_equal_absent_options() {
        let url = "https://e.com/blog/a";
        assert_eq!(
            CacheKey::new(url, &options(Some(""), Some("  "))),
            CacheKey::new(url, &ShortenOptions::default())
        );
    }

    #[test]
    fn test_digest_is_stable_hex() {
        let key = CacheKey::new("https://e.com/", &ShortenOptions::default());
        let digest = key.digest();

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, key.clone().digest());
    }

    #[test]
    fn test_digest_separates_field_boundaries() {
        let a = CacheKey::new("https://e.com/ab", &options(Some("c"), None));
        let b = CacheKey::new("https://e.com/a", &options(Some("bc"), None));
        let c = CacheKey::new("https://e.com/a", &options(None, Some("bc")));

        assert_ne!(a.digest(), b.digest());
        assert_ne!(b.digest(), c.digest());
    }

    #[test]
    fn test_display_lists_present_fields() {
        let key = CacheKey::new("https://e.com/x", &options(None, Some("x")));
        assert_eq!(key.to_string(), "https://e.com/x alias=x");
    }
}
