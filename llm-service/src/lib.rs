//! Thin client layer for the Ollama HTTP API.
//!
//! Two endpoints are wrapped, both non-streaming:
//! - `POST {endpoint}/api/generate`   — text generation
//! - `POST {endpoint}/api/embeddings` — embedding retrieval
//!
//! Construct one [`OllamaService`] per model (typically one for the
//! generator model and one for the embedding model), wrap it in `Arc`,
//! and share it across callers; the underlying `reqwest::Client` is
//! safe for concurrent use.

mod config;
mod error;
mod ollama;

pub use config::LlmModelConfig;
pub use error::LlmError;
pub use ollama::OllamaService;
