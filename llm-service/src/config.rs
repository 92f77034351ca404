//! Model configuration shared by generation and embedding calls.

/// Configuration for one Ollama model endpoint.
///
/// One instance describes one model; callers that need both a generator
/// and an embedder construct two configs (usually differing only in
/// `model`).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier, e.g. `"qwen3:14b"` or `"nomic-embed-text"`.
    pub model: String,

    /// Inference endpoint, e.g. `http://127.0.0.1:11434`.
    pub endpoint: String,

    /// Default maximum number of tokens to generate. Can be overridden
    /// per call.
    pub max_tokens: Option<u32>,

    /// Sampling temperature. `Some(0.0)` disables sampling, which keeps
    /// citation-checking tests deterministic.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout in seconds (default 60 when unset).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Config with conservative defaults for the given endpoint/model.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            endpoint: endpoint.into(),
            max_tokens: Some(512),
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(60),
        }
    }
}
