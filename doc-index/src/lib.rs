//! # doc-index
//!
//! Chunking, ingestion and hybrid-searchable Qdrant index for document
//! question answering.
//!
//! The crate is organized as:
//! - [`chunker`] — word-window splitting of documents
//! - [`record`] — canonical chunk/payload/hit data model
//! - [`qdrant_facade`] — all Qdrant interactions (dense + lexical spaces)
//! - [`embed`] / [`embed_pool`] — embedding providers and batch execution
//! - [`ingest`] — file-to-index pipeline
//!
//! Retrieval consumers depend on the [`SearchIndex`] trait rather than on
//! the Qdrant facade directly.

use std::{future::Future, pin::Pin};

pub mod chunker;
pub mod config;
pub mod embed;
pub mod embed_pool;
pub mod error;
pub mod ingest;
pub mod qdrant_facade;
pub mod record;

pub use config::{DistanceKind, IndexConfig};
pub use embed::EmbeddingsProvider;
pub use error::IndexError;
pub use qdrant_facade::QdrantFacade;
pub use record::{Chunk, ChunkPayload, RawHit, RetrievalHit};

/// Search surface exposed to retrieval.
///
/// Both calls return hits already normalized through the [`RawHit`]
/// boundary, sorted by backend score descending.
pub trait SearchIndex: Send + Sync {
    /// kNN search over the dense embedding space.
    fn dense_search<'a>(
        &'a self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, IndexError>> + Send + 'a>>;

    /// Lexical (BM25) search over the raw query text.
    fn lexical_search<'a>(
        &'a self,
        text: &'a str,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, IndexError>> + Send + 'a>>;
}

impl SearchIndex for QdrantFacade {
    fn dense_search<'a>(
        &'a self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, IndexError>> + Send + 'a>> {
        Box::pin(self.dense_query(vector, limit))
    }

    fn lexical_search<'a>(
        &'a self,
        text: &'a str,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, IndexError>> + Send + 'a>> {
        Box::pin(self.lexical_query(text, limit))
    }
}
