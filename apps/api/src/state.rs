use std::sync::Arc;

use crate::checkin::session::CheckInSession;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::GuidanceModel;
use crate::profile::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The remote guidance capability. `GeminiClient` in production.
    pub model: Arc<dyn GuidanceModel>,
    pub store: Arc<dyn ProfileStore>,
    pub session: Arc<CheckInSession>,
    pub retry_policy: RetryPolicy,
}
