//! Embedding abstraction.
//!
//! Async is required because real providers (Ollama, OpenAI, etc.)
//! perform HTTP requests.

use std::{future::Future, pin::Pin};

use crate::error::IndexError;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in your own embedding backend
/// (e.g., Ollama, OpenAI, local models).
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces an embedding vector for the given text.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;
}

pub mod noop_embedder;
pub mod ollama;
