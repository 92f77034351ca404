//! Ollama embedding provider implementation.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use llm_service::OllamaService;

use crate::embed::EmbeddingsProvider;
use crate::error::IndexError;

/// Ollama embedding provider (async).
///
/// Wraps a shared [`OllamaService`] and enforces the expected embedding
/// dimension on every response.
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
    dim: usize,
}

impl OllamaEmbedder {
    /// Construct a new embedder around an existing service handle.
    pub fn new(svc: Arc<OllamaService>, dim: usize) -> Self {
        Self { svc, dim }
    }

    /// Expected embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .svc
                .embeddings(text)
                .await
                .map_err(|e| IndexError::Embedding(e.to_string()))?;

            if resp.len() != self.dim {
                return Err(IndexError::VectorSizeMismatch {
                    got: resp.len(),
                    want: self.dim,
                });
            }

            Ok(resp)
        })
    }
}
