//! Human-readable alias derivation.
//!
//! Turns a canonical content URL such as `https://example.com/blog/my-post`
//! into an alias candidate like `blog-my-post`. The policy is pure: the same
//! URL always yields the same alias and no I/O happens here.

use url::Url;

/// Identifiers up to this length are used whole.
pub const DEFAULT_DIRECT_MAX_LEN: usize = 50;

/// Budget for the packed body of long identifiers.
pub const DEFAULT_PACKED_MAX_LEN: usize = 30;

const SEGMENT_SEPARATOR: char = '-';

/// Alias derivation rules.
#[derive(Debug, Clone)]
pub struct AliasPolicy {
    namespace: String,
    content_prefix: String,
    direct_max_len: usize,
    packed_max_len: usize,
}

impl AliasPolicy {
    /// Creates a policy.
    ///
    /// # Arguments
    ///
    /// - `namespace` - tag prepended to every alias (`blog` → `blog-...`); empty disables it
    /// - `content_prefix` - path segment that precedes identifiers in canonical URLs
    pub fn new(namespace: impl Into<String>, content_prefix: impl Into<String>) -> Self {
        Self {
            namespace: sanitize(&namespace.into()),
            content_prefix: content_prefix.into().trim_matches('/').to_string(),
            direct_max_len: DEFAULT_DIRECT_MAX_LEN,
            packed_max_len: DEFAULT_PACKED_MAX_LEN,
        }
    }

    /// Overrides the length thresholds.
    pub fn with_limits(mut self, direct_max_len: usize, packed_max_len: usize) -> Self {
        self.direct_max_len = direct_max_len;
        self.packed_max_len = packed_max_len.max(1);
        self
    }

    /// Derives an alias candidate from a long URL.
    ///
    /// Returns `None` when no identifier can be extracted, which tells the
    /// caller to let the provider auto-generate an alias.
    pub fn derive_alias(&self, long_url: &str) -> Option<String> {
        let identifier = self.extract_identifier(long_url)?;

        let body = if identifier.len() <= self.direct_max_len {
            identifier
        } else {
            pack_segments(&identifier, self.packed_max_len)
        };

        Some(self.with_namespace(body))
    }

    /// Extracts and sanitizes the identifier segment of the URL path.
    ///
    /// Prefers the segment right after the content prefix; otherwise takes the
    /// last non-empty segment.
    pub fn extract_identifier(&self, long_url: &str) -> Option<String> {
        let url = Url::parse(long_url).ok()?;
        let segments: Vec<&str> = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect();

        let raw = if self.content_prefix.is_empty() {
            segments.last().copied()
        } else {
            segments
                .iter()
                .position(|segment| *segment == self.content_prefix)
                .and_then(|idx| segments.get(idx + 1).copied())
                .or_else(|| segments.last().copied())
        };
        let raw = raw?;

        if raw == self.content_prefix {
            return None;
        }

        let identifier = sanitize(raw);
        if identifier.is_empty() {
            None
        } else {
            Some(identifier)
        }
    }

    fn with_namespace(&self, body: String) -> String {
        if self.namespace.is_empty() {
            body
        } else {
            format!("{}{}{}", self.namespace, SEGMENT_SEPARATOR, body)
        }
    }
}

/// Greedily packs whole segments left-to-right into `budget` characters.
///
/// Stops at the first segment that would overflow. When even the first
/// segment is too long it is truncated to the budget.
fn pack_segments(identifier: &str, budget: usize) -> String {
    let mut packed = String::with_capacity(budget);

    for segment in identifier.split(SEGMENT_SEPARATOR).filter(|s| !s.is_empty()) {
        let needed = if packed.is_empty() {
            segment.len()
        } else {
            packed.len() + 1 + segment.len()
        };

        if needed > budget {
            break;
        }

        if !packed.is_empty() {
            packed.push(SEGMENT_SEPARATOR);
        }
        packed.push_str(segment);
    }

    if packed.is_empty() {
        // sanitize() guarantees ASCII, so byte slicing is on char boundaries
        let first = identifier
            .split(SEGMENT_SEPARATOR)
            .find(|s| !s.is_empty())
            .unwrap_or(identifier);
        packed.push_str(&first[..first.len().min(budget)]);
    }

    packed
}

/// Lowercases and keeps `[a-z0-9_-]`, collapsing other runs into one separator.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with(SEGMENT_SEPARATOR) {
            out.push(SEGMENT_SEPARATOR);
        }
    }

    while out.ends_with(SEGMENT_SEPARATOR) {
        out.pop();
    }

    out
}
