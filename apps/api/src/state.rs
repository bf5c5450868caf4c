use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::dataset::DatasetSource;
use crate::pipeline::ResumeAssembler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup around the read-only classifier.
    pub assembler: Arc<ResumeAssembler>,
    /// Pluggable dataset source: local CSV or an S3 object, re-read on every batch request.
    pub dataset: Arc<dyn DatasetSource>,
    pub sessions: Arc<SessionStore>,
}
