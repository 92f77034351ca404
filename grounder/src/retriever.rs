//! Hybrid retrieval: lexical + dense search with score fusion.

use std::sync::Arc;

use doc_index::{EmbeddingsProvider, RetrievalHit, SearchIndex};
use tracing::{debug, instrument, trace};

use crate::error::GrounderError;
use crate::fusion::{FusedCandidate, FusionStrategy, fuse};

/// Number of candidates fetched from each backend before fusion.
pub const CANDIDATE_POOL: u64 = 20;

/// Retriever combining a lexical and a dense search over the same index.
pub struct HybridRetriever {
    index: Arc<dyn SearchIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    strategy: FusionStrategy,
}

impl HybridRetriever {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        strategy: FusionStrategy,
    ) -> Self {
        Self {
            index,
            embedder,
            strategy,
        }
    }

    /// Lexical candidates for the raw query text.
    pub async fn lexical_search(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<RetrievalHit>, GrounderError> {
        trace!("lexical_search limit={limit}");
        Ok(self.index.lexical_search(query, limit).await?)
    }

    /// Dense candidates: embeds the query, then does kNN.
    pub async fn dense_search(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<RetrievalHit>, GrounderError> {
        trace!("dense_search limit={limit}");
        let vector = self.embedder.embed(query).await?;
        Ok(self.index.dense_search(vector, limit).await?)
    }

    /// Runs both searches over a fixed candidate pool, fuses the lists
    /// and returns the top `top_k` candidates.
    ///
    /// An empty query or `top_k == 0` short-circuits to an empty result.
    #[instrument(skip(self))]
    pub async fn merge_and_rerank(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<FusedCandidate>, GrounderError> {
        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let lexical = self.lexical_search(query, CANDIDATE_POOL).await?;
        let dense = self.dense_search(query, CANDIDATE_POOL).await?;
        debug!(
            "retrieved {} lexical and {} dense candidates",
            lexical.len(),
            dense.len()
        );

        Ok(fuse(&lexical, &dense, self.strategy, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_index::{ChunkPayload, IndexError};
    use std::{future::Future, pin::Pin};

    struct StubIndex {
        lexical: Vec<RetrievalHit>,
        dense: Vec<RetrievalHit>,
    }

    impl SearchIndex for StubIndex {
        fn dense_search<'a>(
            &'a self,
            _vector: Vec<f32>,
            limit: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, IndexError>> + Send + 'a>>
        {
            let mut hits = self.dense.clone();
            hits.truncate(limit as usize);
            Box::pin(async move { Ok(hits) })
        }

        fn lexical_search<'a>(
            &'a self,
            _text: &'a str,
            limit: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, IndexError>> + Send + 'a>>
        {
            let mut hits = self.lexical.clone();
            hits.truncate(limit as usize);
            Box::pin(async move { Ok(hits) })
        }
    }

    struct StubEmbedder;

    impl EmbeddingsProvider for StubEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
            Box::pin(async { Ok(vec![0.0; 4]) })
        }
    }

    fn hit(id: &str, score: f32, source: &str, chunk_id: u64) -> RetrievalHit {
        RetrievalHit {
            id: id.to_string(),
            score,
            payload: ChunkPayload {
                source: source.to_string(),
                chunk_id,
                text: format!("text of {source}:{chunk_id}"),
            },
            vector: None,
        }
    }

    fn retriever(lexical: Vec<RetrievalHit>, dense: Vec<RetrievalHit>) -> HybridRetriever {
        HybridRetriever::new(
            Arc::new(StubIndex { lexical, dense }),
            Arc::new(StubEmbedder),
            FusionStrategy::default(),
        )
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let r = retriever(vec![hit("1", 1.0, "a", 0)], vec![]);
        let out = r.merge_and_rerank("   ", 5).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn merges_overlapping_candidates() {
        let r = retriever(
            vec![hit("1", 10.0, "a", 0)],
            vec![hit("1", 0.8, "a", 0), hit("2", 0.6, "b", 3)],
        );
        let out = r.merge_and_rerank("query", 5).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "1");
        assert!((out[0].fused_score - 4.94).abs() < 1e-5);
        assert_eq!(out[1].payload.source, "b");
    }

    #[tokio::test]
    async fn respects_top_k() {
        let dense = (0..10)
            .map(|i| hit(&i.to_string(), 1.0 - i as f32 * 0.05, "d", i))
            .collect();
        let r = retriever(vec![], dense);
        let out = r.merge_and_rerank("query", 3).await.unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].id, "0");
    }
}
