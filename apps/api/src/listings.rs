//! Job listings blob, loaded once at startup and spliced verbatim into prompts.
//!
//! The content is never parsed here; whatever structure the file has is left to the model.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

/// Immutable, cheaply clonable listing text.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    text: Arc<str>,
}

impl ListingStore {
    /// Reads the listings file. A missing or unreadable file is not fatal:
    /// the service starts in degraded mode with an empty blob.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!(
                    "Loaded job listings from {} ({} bytes)",
                    path.display(),
                    text.len()
                );
                Self::from_text(text)
            }
            Err(e) => {
                warn!(
                    "Could not read job listings at {}: {e}. Continuing without listings",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn from_text(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
