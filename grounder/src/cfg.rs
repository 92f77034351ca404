//! Runtime configuration loaded from environment variables.

use doc_index::IndexConfig;
use llm_service::LlmModelConfig;

use crate::fusion::{FusionStrategy, RRF_K};

/// Config bag for the QA pipeline. All fields have defaults via [`QaConfig::from_env`].
#[derive(Clone, Debug)]
pub struct QaConfig {
    // Retrieval knobs
    pub top_k: usize,
    pub fusion: FusionStrategy,
    pub max_answer_tokens: u32,

    // Collaborator endpoints
    pub qdrant_url: String,
    pub qdrant_collection: String,
    pub ollama_url: String,
    pub embed_model: String,
    pub generator_model: String,
    pub embedding_dim: usize,
}

impl QaConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let fusion = match env("FUSION", "weighted").as_str() {
            "rrf" => FusionStrategy::ReciprocalRank {
                k: parse("RRF_K", RRF_K),
            },
            _ => FusionStrategy::WeightedScore {
                w_dense: parse("W_DENSE", 0.55f32),
                w_lexical: parse("W_LEXICAL", 0.45f32),
            },
        };

        Self {
            top_k: parse("RAG_TOP_K", 5usize),
            fusion,
            max_answer_tokens: parse("MAX_ANSWER_TOKENS", 512u32),

            qdrant_url: env("QDRANT_URL", "http://127.0.0.1:6334"),
            qdrant_collection: env("QDRANT_COLLECTION", "papers"),
            ollama_url: env("OLLAMA_URL", "http://127.0.0.1:11434"),
            embed_model: env("EMBED_MODEL", "nomic-embed-text"),
            generator_model: env("GENERATOR_MODEL", "llama3.1"),
            embedding_dim: parse("EMBEDDING_DIM", 384usize),
        }
    }

    /// Convert to a `doc_index::IndexConfig` used for ingestion and search.
    pub fn make_index_config(&self) -> IndexConfig {
        let mut cfg = IndexConfig::new_default(&self.qdrant_url, &self.qdrant_collection);
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY").ok();
        cfg.embedding_dim = self.embedding_dim;
        cfg.upsert_batch = parse("UPSERT_BATCH", cfg.upsert_batch);
        cfg.chunk_words = parse("CHUNK_WORDS", cfg.chunk_words);
        cfg.chunk_overlap = parse("CHUNK_OVERLAP", cfg.chunk_overlap);
        cfg.stored_text_max = parse("STORED_TEXT_MAX", cfg.stored_text_max);
        cfg.embed_concurrency = parse("EMBED_CONCURRENCY", cfg.embed_concurrency);
        cfg
    }

    /// Model config for the embedding endpoint.
    pub fn make_embed_llm_config(&self) -> LlmModelConfig {
        LlmModelConfig::new(&self.ollama_url, &self.embed_model)
    }

    /// Model config for the answer-generation endpoint.
    pub fn make_generator_llm_config(&self) -> LlmModelConfig {
        let mut cfg = LlmModelConfig::new(&self.ollama_url, &self.generator_model);
        cfg.max_tokens = Some(self.max_answer_tokens);
        cfg
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
