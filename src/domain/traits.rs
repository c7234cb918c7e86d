use crate::domain::error::HqError;
use crate::domain::model::Asset;
use async_trait::async_trait;

/// Trait for asset lookup services
///
/// This trait abstracts the two backend endpoints the scanner depends on,
/// so the scan session can be driven against a stub in tests and other
/// backends can be plugged in without changing the calling code.
#[async_trait]
pub trait AssetLookup: Send + Sync {
    /// Fast single-field lookup; `Ok(None)` is a clean not-found
    async fn scan(&self, code: &str) -> Result<Option<Asset>, HqError>;

    /// Broader fallback search
    async fn search(&self, code: &str) -> Result<Vec<Asset>, HqError>;
}

/// Trait for notice delivery channels
///
/// Reserved for future delivery targets (desktop notification, webhook).
/// Currently notices are only rendered to the terminal.
#[allow(dead_code)]
pub trait NoticeSink {
    fn push(&self, message: &str);
}
