//! Content item metadata as delivered by the content-management source.

use serde::{Deserialize, Deserializer, Serialize};

/// A content item that may receive a short link.
///
/// Dates are kept as the raw strings the source sent; parsing happens in
/// [`crate::domain::eligibility::EligibilityValidator`] so that malformed values
/// become ineligibility reasons instead of request errors.
///
/// Accepts both plain field names and the underscore-prefixed system fields
/// emitted by headless CMS webhooks (`_id`, `_type`, `_createdAt`), and a slug
/// given either as a string or as `{ "current": "..." }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default, alias = "_id", deserialize_with = "deserialize_nullable")]
    pub id: String,

    #[serde(default, deserialize_with = "deserialize_slug")]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub title: String,

    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default, alias = "_createdAt")]
    pub created_at: Option<String>,

    #[serde(default, alias = "_type")]
    pub content_type: Option<String>,
}

impl ContentItem {
    /// Creates an item with the given id, slug and title and no dates.
    pub fn new(id: impl Into<String>, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: Some(slug.into()),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the publish timestamp.
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// The identifier used in the canonical URL: the slug, or the id when no slug is set.
    pub fn identifier(&self) -> &str {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug,
            _ => self.id.trim(),
        }
    }

    /// Key used for this item in batch reports.
    pub fn report_key(&self) -> String {
        if self.id.trim().is_empty() {
            self.identifier().to_string()
        } else {
            self.id.clone()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlugField {
    Plain(String),
    Object { current: Option<String> },
}

fn deserialize_slug<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<SlugField>::deserialize(deserializer)?;
    Ok(match field {
        Some(SlugField::Plain(s)) => Some(s),
        Some(SlugField::Object { current }) => current,
        None => None,
    })
}

/// Drafts often carry `null` for fields the editor has not filled in yet.
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
