//! Router boundary the bubble relays queries through.

use async_trait::async_trait;
use calix_core::Result;
use calix_protocol::{RouterRequest, RouterResponse};

/// Extension message-router boundary.
///
/// The real router is platform-provided; implementations forward the
/// request to whatever answers `CALI_QUERY` and return its response.
#[async_trait]
pub trait QueryRouter: Send + Sync {
    async fn route(&self, request: RouterRequest) -> Result<RouterResponse>;
}
