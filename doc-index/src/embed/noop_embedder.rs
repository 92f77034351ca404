use std::{future::Future, pin::Pin};

use crate::embed::EmbeddingsProvider;
use crate::error::IndexError;

/// Embedder that always fails. Useful when wiring pipelines that must
/// never reach the embedding step.
#[derive(Clone)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async { Err(IndexError::Embedding("no embedder configured".into())) })
    }
}
