use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::inference::InferenceService;
use crate::render::DocumentRenderer;
use crate::storage::files::FileStore;
use crate::storage::kv::KvStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Each external collaborator sits behind a trait object so the pipeline and
/// views can run against test doubles.
#[derive(Clone)]
pub struct AppState {
    pub files: Arc<dyn FileStore>,
    pub kv: Arc<dyn KvStore>,
    pub ai: Arc<dyn InferenceService>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub auth: Arc<dyn Authenticator>,
    pub config: Config,
}
