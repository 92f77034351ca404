//! Runtime and collection configuration.

use crate::error::IndexError;

/// Distance function used for the dense vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration for ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Dense embedding dimensionality.
    pub embedding_dim: usize,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Chunk window size in words.
    pub chunk_words: usize,
    /// Overlap between consecutive chunks, in words.
    pub chunk_overlap: usize,
    /// Maximum number of characters of chunk text stored in the payload.
    /// The full chunk text is still what gets embedded.
    pub stored_text_max: usize,
    /// Bounded concurrency for batch embedding.
    pub embed_concurrency: usize,
}

impl IndexConfig {
    /// Creates a sane default config for a given Qdrant endpoint and
    /// collection name.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            embedding_dim: 384,
            upsert_batch: 256,
            chunk_words: 800,
            chunk_overlap: 200,
            stored_text_max: 2000,
            embed_concurrency: 4,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(IndexError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(IndexError::Config("collection is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(IndexError::Config("embedding_dim must be > 0".into()));
        }
        if self.upsert_batch == 0 {
            return Err(IndexError::Config("upsert_batch must be > 0".into()));
        }
        if self.chunk_words == 0 {
            return Err(IndexError::Config("chunk_words must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_words {
            return Err(IndexError::Config(
                "chunk_overlap must be smaller than chunk_words".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = IndexConfig::new_default("http://127.0.0.1:6334", "papers");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overlap_must_be_smaller_than_window() {
        let mut cfg = IndexConfig::new_default("http://127.0.0.1:6334", "papers");
        cfg.chunk_overlap = cfg.chunk_words;
        assert!(matches!(cfg.validate(), Err(IndexError::Config(_))));
    }
}
