//! Shared-secret authentication for the webhook and admin surfaces.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation key for stored credential digests.
const DIGEST_KEY: &[u8] = b"link-gateway/credential";

/// Verifies presented secrets against the configured ones.
///
/// Only HMAC-SHA256 digests of the configured secrets are kept, and presented
/// values are compared with [`Mac::verify_slice`], which runs in constant time.
/// A surface without a configured secret rejects every call.
pub struct AuthService {
    webhook_digest: Option<Vec<u8>>,
    admin_digest: Option<Vec<u8>>,
}

impl AuthService {
    /// Creates the service.
    ///
    /// # Arguments
    ///
    /// - `webhook_secret` - shared secret expected from the content source
    /// - `admin_token` - Bearer token for the admin routes
    pub fn new(webhook_secret: Option<&str>, admin_token: Option<&str>) -> Self {
        Self {
            webhook_digest: webhook_secret.filter(|s| !s.is_empty()).map(digest),
            admin_digest: admin_token.filter(|s| !s.is_empty()).map(digest),
        }
    }

    pub fn webhook_configured(&self) -> bool {
        self.webhook_digest.is_some()
    }

    pub fn admin_configured(&self) -> bool {
        self.admin_digest.is_some()
    }

    /// Checks the secret sent with a webhook call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when no secret was presented, when it
    /// does not match, or when no webhook secret is configured.
    pub fn verify_webhook(&self, presented: Option<&str>) -> Result<(), AppError> {
        verify(self.webhook_digest.as_deref(), presented, "webhook")
    }

    /// Checks an admin Bearer token.
    ///
    /// # Errors
    ///
    /// Same rules as [`AuthService::verify_webhook`].
    pub fn verify_admin(&self, presented: Option<&str>) -> Result<(), AppError> {
        verify(self.admin_digest.as_deref(), presented, "admin")
    }
}

fn digest(secret: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(DIGEST_KEY).expect("HMAC accepts any key length");
    mac.update(secret.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn verify(expected: Option<&[u8]>, presented: Option<&str>, surface: &str) -> Result<(), AppError> {
    let Some(expected) = expected else {
        return Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": format!("No {} secret configured", surface)}),
        ));
    };

    let Some(presented) = presented.filter(|p| !p.is_empty()) else {
        return Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Missing credentials"}),
        ));
    };

    let mut mac = HmacSha256::new_from_slice(DIGEST_KEY).expect("HMAC accepts any key length");
    mac.update(presented.as_bytes());

    mac.verify_slice(expected).map_err(|_| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Invalid credentials"}))
    })
}
