//! Sequential batch shortening with pacing and per-item error isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::services::ShortenerClient;
use crate::domain::eligibility::{EligibilityResult, EligibilityValidator};
use crate::domain::entities::{ContentItem, ShortenOptions, ShortenResult};
use crate::utils::content_url::ContentUrlBuilder;

/// Default pause between two consecutive items.
pub const DEFAULT_BULK_DELAY: Duration = Duration::from_millis(150);

/// Batch switches.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOptions {
    /// Process items that fail eligibility instead of skipping them.
    #[serde(default)]
    pub include_ineligible: bool,
    /// Pass `force` to the validator for every item.
    #[serde(default)]
    pub force: bool,
}

/// Items processed so far. `completed` never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkProgress {
    pub completed: usize,
    pub total: usize,
}

/// Outcome of one processed item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult {
    pub id: String,
    pub result: ShortenResult,
}

/// Item that did not produce a shortened link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemError {
    pub id: String,
    pub message: String,
}

/// Item left out by the eligibility filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItem {
    pub id: String,
    pub reasons: Vec<String>,
}

/// Report of one batch run.
///
/// `results` and `errors` keep input order. An item whose result is
/// degraded appears in both.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkJob {
    pub total_items: usize,
    pub results: Vec<BulkItemResult>,
    pub errors: Vec<BulkItemError>,
    pub skipped: Vec<SkippedItem>,
    pub progress: BulkProgress,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BulkJob {
    pub fn shortened_count(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_shortened()).count()
    }

    pub fn result_for(&self, id: &str) -> Option<&ShortenResult> {
        self.results.iter().find(|r| r.id == id).map(|r| &r.result)
    }

    pub fn error_for(&self, id: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.message.as_str())
    }
}

/// Eligibility split of a batch before any shortening happens.
pub struct BulkPlan<'a> {
    pub selected: Vec<(&'a ContentItem, EligibilityResult)>,
    pub skipped: Vec<SkippedItem>,
}

/// Drives the shortener client over a collection of content items.
///
/// Items are processed one at a time in input order with a fixed delay in
/// between, so a batch never bursts through the provider quota. A failing
/// item is recorded and the batch moves on.
pub struct BulkOrchestrator {
    client: Arc<ShortenerClient>,
    validator: EligibilityValidator,
    urls: ContentUrlBuilder,
    delay: Duration,
}

impl BulkOrchestrator {
    pub fn new(
        client: Arc<ShortenerClient>,
        validator: EligibilityValidator,
        urls: ContentUrlBuilder,
        delay: Duration,
    ) -> Self {
        Self {
            client,
            validator,
            urls,
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Splits items into the ones a run would process and the skipped ones.
    pub fn plan<'a>(&self, items: &'a [ContentItem], options: BulkOptions) -> BulkPlan<'a> {
        let mut selected = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();

        for item in items {
            let eligibility = self.validator.validate_with(item, options.force);
            if eligibility.is_eligible || options.include_ineligible {
                selected.push((item, eligibility));
            } else {
                debug!("Skipping {}: {:?}", item.report_key(), eligibility.reasons);
                skipped.push(SkippedItem {
                    id: item.report_key(),
                    reasons: eligibility.reasons,
                });
            }
        }

        BulkPlan { selected, skipped }
    }

    /// Runs a batch without progress reporting.
    pub async fn run_batch(&self, items: &[ContentItem], options: BulkOptions) -> BulkJob {
        let (tx, _rx) = watch::channel(BulkProgress::default());
        self.run_batch_with_progress(items, options, &tx).await
    }

    /// Runs a batch, publishing progress after every processed item.
    ///
    /// Sending never fails the batch; dropped receivers are ignored.
    pub async fn run_batch_with_progress(
        &self,
        items: &[ContentItem],
        options: BulkOptions,
        progress_tx: &watch::Sender<BulkProgress>,
    ) -> BulkJob {
        let started_at = Utc::now();
        let plan = self.plan(items, options);
        let total = plan.selected.len();

        info!(
            "Bulk run: {} items, {} selected, {} skipped",
            items.len(),
            total,
            plan.skipped.len()
        );

        let mut progress = BulkProgress {
            completed: 0,
            total,
        };
        progress_tx.send_replace(progress);

        let mut results = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for (index, (item, _)) in plan.selected.iter().enumerate() {
            let id = item.report_key();

            match self.process_item(item).await {
                Ok(result) => {
                    if let Some(reason) = result.error_reason {
                        errors.push(BulkItemError {
                            id: id.clone(),
                            message: reason.as_str().to_string(),
                        });
                    }
                    let outcome = if result.succeeded { "shortened" } else { "degraded" };
                    metrics::counter!("bulk_items_total", "outcome" => outcome).increment(1);
                    results.push(BulkItemResult { id, result });
                }
                Err(message) => {
                    warn!("Bulk item {} failed: {}", id, message);
                    metrics::counter!("bulk_items_total", "outcome" => "failed").increment(1);
                    errors.push(BulkItemError { id, message });
                }
            }

            progress.completed += 1;
            progress_tx.send_replace(progress);

            if index + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let job = BulkJob {
            total_items: items.len(),
            results,
            errors,
            skipped: plan.skipped,
            progress,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Bulk run finished: {}/{} shortened, {} errors",
            job.shortened_count(),
            total,
            job.errors.len()
        );

        job
    }

    async fn process_item(&self, item: &ContentItem) -> Result<ShortenResult, String> {
        let long_url = self
            .urls
            .canonical_url(item.identifier())
            .ok_or_else(|| "missing identifier".to_string())?;

        Ok(self.client.shorten(&long_url, &ShortenOptions::default()).await)
    }
}
