//! DTOs for the admin batch endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::BulkOptions;
use crate::domain::entities::ContentItem;

/// Batch request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    /// At most 500 items per HTTP batch.
    #[validate(length(min = 1, max = 500))]
    pub items: Vec<ContentItem>,

    #[serde(default)]
    pub include_ineligible: bool,

    #[serde(default)]
    pub force: bool,
}

impl BulkRequest {
    pub fn options(&self) -> BulkOptions {
        BulkOptions {
            include_ineligible: self.include_ineligible,
            force: self.force,
        }
    }
}
