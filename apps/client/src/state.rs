use std::sync::Arc;

use crate::api_client::ResumeApi;
use crate::config::Config;
use crate::render::ResumeRenderer;

/// Shared services owned by the application root and lent to every panel.
///
/// The session is deliberately not in here: it is owned by the root next to
/// this struct so that only the root can mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable backend. Default: `HttpResumeApi`.
    pub api: Arc<dyn ResumeApi>,
    /// Pluggable document renderer for export and profile saves.
    pub renderer: Arc<dyn ResumeRenderer>,
}
