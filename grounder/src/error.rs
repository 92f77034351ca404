//! Typed error for the grounder crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrounderError {
    /// Errors from the underlying doc-index crate.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] doc_index::IndexError),

    /// Errors from the LLM backend.
    #[error("llm error: {0}")]
    Llm(#[from] llm_service::LlmError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),
}
