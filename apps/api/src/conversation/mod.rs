// Conversation flow: slot filling over free-text turns, prompt assembly, résumé intake.
// All model calls go through llm_client; nothing here talks HTTP to the provider.

pub mod assembler;
pub mod handlers;
pub mod intent;
pub mod machine;
pub mod prompts;
pub mod resume;
pub mod sessions;
pub mod state;
