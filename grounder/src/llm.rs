//! Text generation abstraction and the Ollama-backed implementation.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use llm_service::OllamaService;

use crate::error::GrounderError;

/// Backend that turns a prompt into an answer.
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`, capped at `max_tokens` when set.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: Option<u32>,
    ) -> Pin<Box<dyn Future<Output = Result<String, GrounderError>> + Send + 'a>>;
}

/// [`TextGenerator`] backed by a shared [`OllamaService`].
#[derive(Clone)]
pub struct OllamaGenerator {
    svc: Arc<OllamaService>,
}

impl OllamaGenerator {
    pub fn new(svc: Arc<OllamaService>) -> Self {
        Self { svc }
    }
}

impl TextGenerator for OllamaGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: Option<u32>,
    ) -> Pin<Box<dyn Future<Output = Result<String, GrounderError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.svc.generate(prompt, max_tokens).await?) })
    }
}
