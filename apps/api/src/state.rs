use std::sync::Arc;

use crate::config::Config;
use crate::conversation::intent::IntentClassifier;
use crate::conversation::sessions::SessionStore;
use crate::listings::ListingStore;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable completion backend. Default: `LlmClient` (DeepSeek chat completions).
    pub llm: Arc<dyn CompletionProvider>,
    /// Pluggable intent classifier. Default: `KeywordClassifier`.
    pub classifier: Arc<dyn IntentClassifier>,
    pub sessions: Arc<SessionStore>,
    pub listings: ListingStore,
}
