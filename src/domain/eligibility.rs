//! Time-based eligibility for short links.
//!
//! Content published on or after the cutoff is "new" and receives short
//! links; older content is "legacy" and keeps its long URL. Validation fails
//! closed: an item whose dates are missing or malformed is never eligible.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::entities::ContentItem;

/// Verdict for one content item. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub is_eligible: bool,
    pub is_new_item: bool,
    pub has_valid_data: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub reasons: Vec<String>,
}

/// Decides whether content items qualify for shortening.
#[derive(Debug, Clone)]
pub struct EligibilityValidator {
    cutoff: DateTime<Utc>,
}

impl EligibilityValidator {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Validates an item without overrides.
    pub fn validate(&self, item: &ContentItem) -> EligibilityResult {
        self.validate_with(item, false)
    }

    /// Validates an item; `force` overrides the date gate only. Items without
    /// an identifier or title stay ineligible.
    ///
    /// Forcing never hides problems: `reasons`, `is_new_item` and
    /// `has_valid_data` still describe the item as it is.
    pub fn validate_with(&self, item: &ContentItem, force: bool) -> EligibilityResult {
        let mut reasons = Vec::new();

        let has_identifier = !item.identifier().is_empty();
        let has_title = !item.title.trim().is_empty();
        if !has_identifier {
            reasons.push("missing identifier".to_string());
        }
        if !has_title {
            reasons.push("missing title".to_string());
        }
        let has_valid_data = has_identifier && has_title;

        let publish_date = self.resolve_publish_date(item, &mut reasons);

        let is_new_item = match publish_date {
            Some(date) if date >= self.cutoff => true,
            Some(date) => {
                reasons.push(format!(
                    "published {} before cutoff {}",
                    date.to_rfc3339(),
                    self.cutoff.to_rfc3339()
                ));
                false
            }
            None => false,
        };

        if force && !is_new_item {
            reasons.push("eligibility forced".to_string());
        }
        let is_eligible = has_valid_data && (is_new_item || force);

        EligibilityResult {
            is_eligible,
            is_new_item,
            has_valid_data,
            publish_date,
            reasons,
        }
    }

    /// Publish timestamp, falling back to the creation timestamp.
    fn resolve_publish_date(
        &self,
        item: &ContentItem,
        reasons: &mut Vec<String>,
    ) -> Option<DateTime<Utc>> {
        let (label, raw) = match (item.published_at.as_deref(), item.created_at.as_deref()) {
            (Some(published), _) if !published.trim().is_empty() => ("publish", published),
            (_, Some(created)) if !created.trim().is_empty() => ("creation", created),
            _ => {
                reasons.push("missing publish and creation date".to_string());
                return None;
            }
        };

        match parse_timestamp(raw) {
            Some(date) => Some(date),
            None => {
                reasons.push(format!("unparseable {} date: {}", label, raw.trim()));
                None
            }
        }
    }
}

/// Parses RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> EligibilityValidator {
        EligibilityValidator::new(parse_timestamp("2025-09-29T00:00:00Z").unwrap())
    }

    #[test]
    fn test_item_after_cutoff_is_new() {
        let item = ContentItem::new("1", "fresh", "Fresh").with_published_at("2025-09-30T00:00:00Z");
        let result = validator().validate(&item);

        assert!(result.is_new_item);
        assert!(result.has_valid_data);
        assert!(result.is_eligible);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_item_before_cutoff_is_legacy() {
        let item = ContentItem::new("1", "old", "Old").with_published_at("2025-09-20T00:00:00Z");
        let result = validator().validate(&item);

        assert!(!result.is_new_item);
        assert!(!result.is_eligible);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].contains("before cutoff"));
    }

    #[test]
    fn test_item_exactly_at_cutoff_is_new() {
        let item = ContentItem::new("1", "edge", "Edge").with_published_at("2025-09-29T00:00:00Z");
        assert!(validator().validate(&item).is_new_item);
    }

    #[test]
    fn test_creation_date_used_when_publish_missing() {
        let item = ContentItem::new("1", "draft", "Draft").with_created_at("2025-10-05T12:00:00Z");
        let result = validator().validate(&item);

        assert!(result.is_eligible);
        assert_eq!(
            result.publish_date,
            parse_timestamp("2025-10-05T12:00:00Z")
        );
    }

    #[test]
    fn test_publish_date_takes_priority_over_creation() {
        let item = ContentItem::new("1", "moved", "Moved")
            .with_published_at("2025-09-01T00:00:00Z")
            .with_created_at("2025-10-01T00:00:00Z");

        assert!(!validator().validate(&item).is_new_item);
    }

    #[test]
    fn test_empty_title_is_never_eligible() {
        let item = ContentItem::new("1", "slug", "  ").with_published_at("2026-01-01T00:00:00Z");
        let result = validator().validate(&item);

        assert!(result.is_new_item);
        assert!(!result.has_valid_data);
        assert!(!result.is_eligible);
        assert!(result.reasons.iter().any(|r| r == "missing title"));
    }

    #[test]
    fn test_empty_identifier_is_never_eligible() {
        let item = ContentItem {
            title: "Title".to_string(),
            published_at: Some("2026-01-01T00:00:00Z".to_string()),
            ..ContentItem::default()
        };
        let result = validator().validate(&item);

        assert!(!result.is_eligible);
        assert!(result.reasons.iter().any(|r| r == "missing identifier"));
    }

    #[test]
    fn test_missing_dates_fail_closed() {
        let item = ContentItem::new("1", "undated", "Undated");
        let result = validator().validate(&item);

        assert!(!result.is_eligible);
        assert!(result.publish_date.is_none());
        assert!(result.reasons.iter().any(|r| r.contains("missing publish")));
    }

    #[test]
    fn test_unparseable_date_fails_closed() {
        let item = ContentItem::new("1", "bad", "Bad").with_published_at("next tuesday");
        let result = validator().validate(&item);

        assert!(!result.is_eligible);
        assert!(
            result
                .reasons
                .iter()
                .any(|r| r.contains("unparseable publish date"))
        );
    }

    #[test]
    fn test_force_overrides_verdict_but_keeps_reasons() {
        let item = ContentItem::new("1", "old", "Old").with_published_at("2020-01-01T00:00:00Z");
        let result = validator().validate_with(&item, true);

        assert!(result.is_eligible);
        assert!(!result.is_new_item);
        assert!(result.reasons.iter().any(|r| r.contains("before cutoff")));
        assert!(result.reasons.iter().any(|r| r == "eligibility forced"));
    }

    #[test]
    fn test_force_does_not_override_missing_data() {
        let untitled = ContentItem::new("1", "old", "").with_published_at("2020-01-01T00:00:00Z");
        let result = validator().validate_with(&untitled, true);

        assert!(!result.is_eligible);
        assert!(!result.has_valid_data);
        assert!(result.reasons.iter().any(|r| r == "missing title"));

        let anonymous = ContentItem::new("", "", "Title").with_published_at("2025-10-01T00:00:00Z");
        assert!(!validator().validate_with(&anonymous, true).is_eligible);
    }

    #[test]
    fn test_force_covers_undated_items() {
        let item = ContentItem::new("1", "undated", "Undated");
        let result = validator().validate_with(&item, true);

        assert!(result.is_eligible);
        assert!(result.publish_date.is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-09-29T00:00:00Z").is_some());
        assert!(parse_timestamp("2025-09-29T02:00:00+02:00").is_some());
        assert_eq!(
            parse_timestamp("2025-09-29"),
            parse_timestamp("2025-09-29T00:00:00Z")
        );
        assert!(parse_timestamp("29/09/2025").is_none());
    }
}
