#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use link_gateway::application::services::{AuthService, ShortenerClient, ShortenerSettings};
use link_gateway::domain::alias_policy::AliasPolicy;
use link_gateway::domain::eligibility::EligibilityValidator;
use link_gateway::domain::rate_limiter::RateLimiter;
use link_gateway::domain::upstream::{
    CreateLinkRequest, CreatedLink, ShortenProvider, UpstreamError,
};
use link_gateway::infrastructure::cache::MemoryCache;
use link_gateway::state::AppState;
use link_gateway::utils::content_url::ContentUrlBuilder;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const BASE_URL: &str = "https://example.com";

/// Provider that replays scripted answers, then succeeds with a slug-based
/// short URL. Records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<CreatedLink, UpstreamError>>>,
    requests: Mutex<Vec<CreateLinkRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, answer: Result<CreatedLink, UpstreamError>) {
        self.script.lock().push_back(answer);
    }

    pub fn requests(&self) -> Vec<CreateLinkRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ShortenProvider for ScriptedProvider {
    async fn create(&self, request: CreateLinkRequest) -> Result<CreatedLink, UpstreamError> {
        self.requests.lock().push(request.clone());

        if let Some(answer) = self.script.lock().pop_front() {
            return answer;
        }

        let alias = request.alias.clone().unwrap_or_else(|| {
            request
                .url
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        });

        Ok(CreatedLink {
            short_url: format!("https://tinyurl.com/{}", alias),
            alias: Some(alias),
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub struct TestStateBuilder {
    provider: Option<Arc<dyn ShortenProvider>>,
    max_requests: usize,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            max_requests: 10,
        }
    }

    pub fn provider(mut self, provider: Arc<ScriptedProvider>) -> Self {
        self.provider = Some(provider as Arc<dyn ShortenProvider>);
        self
    }

    pub fn max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn build(self) -> AppState {
        let shortener = ShortenerClient::new(
            self.provider,
            Arc::new(MemoryCache::new()),
            Arc::new(RateLimiter::new(self.max_requests, Duration::from_secs(60))),
            AliasPolicy::new("blog", "blog"),
            ShortenerSettings::default(),
        );

        AppState::new(
            Arc::new(shortener),
            EligibilityValidator::new(Utc.with_ymd_and_hms(2025, 9, 29, 0, 0, 0).unwrap()),
            ContentUrlBuilder::new(BASE_URL, "blog").unwrap(),
            AuthService::new(Some(WEBHOOK_SECRET), Some(ADMIN_TOKEN)),
            Duration::ZERO,
            vec!["post".to_string()],
        )
    }
}

/// State with a scripted provider and default limits.
pub fn create_test_state() -> (AppState, Arc<ScriptedProvider>) {
    let provider = ScriptedProvider::new();
    let state = TestStateBuilder::new().provider(provider.clone()).build();
    (state, provider)
}
