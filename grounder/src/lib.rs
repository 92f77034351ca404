//! Retrieval-augmented QA over a hybrid document index.
//!
//! Public surface: [`QaService`]. It runs lexical + dense retrieval with
//! score fusion over `doc-index`, builds a restrictive prompt from the
//! winning chunks, calls the generation model, and validates that every
//! citation in the answer points at retrieved context.

mod api_types;
mod cfg;
mod error;
mod fusion;
mod generator;
mod llm;
mod retriever;

pub use api_types::{AskOptions, QaAnswer, UsedChunk};
pub use cfg::QaConfig;
pub use error::GrounderError;
pub use fusion::{FusedCandidate, FusionStrategy, RRF_K, fuse};
pub use generator::{
    CITATION_WARNING, GroundedGenerator, NO_ANSWER_FALLBACK, build_context_block, build_prompt,
    extract_citations,
};
pub use llm::{OllamaGenerator, TextGenerator};
pub use retriever::{CANDIDATE_POOL, HybridRetriever};

use std::sync::Arc;

use doc_index::{EmbeddingsProvider, SearchIndex};

/// One-stop QA pipeline: hybrid retrieval plus grounded generation.
///
/// Construct it once with shared collaborator handles and call
/// [`QaService::ask`] per question.
pub struct QaService {
    retriever: HybridRetriever,
    generator: GroundedGenerator,
    cfg: QaConfig,
}

impl QaService {
    pub fn new(
        cfg: QaConfig,
        index: Arc<dyn SearchIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        llm: Arc<dyn TextGenerator>,
    ) -> Self {
        let retriever = HybridRetriever::new(index, embedder, cfg.fusion);
        let generator = GroundedGenerator::new(llm, Some(cfg.max_answer_tokens));
        Self {
            retriever,
            generator,
            cfg,
        }
    }

    /// Answers a question from indexed documents.
    ///
    /// Any `AskOptions` field set to `0` falls back to the corresponding
    /// config value. Returns the answer plus the exact chunks shown to
    /// the model, in fused-rank order.
    pub async fn ask(
        &self,
        question: &str,
        opts: AskOptions,
    ) -> Result<QaAnswer, GrounderError> {
        let top_k = if opts.top_k > 0 {
            opts.top_k
        } else {
            self.cfg.top_k
        };
        let max_tokens = (opts.max_answer_tokens > 0).then_some(opts.max_answer_tokens);

        let candidates = self.retriever.merge_and_rerank(question, top_k).await?;
        let answer = self
            .generator
            .generate(question, &candidates, max_tokens)
            .await?;

        let context = candidates
            .into_iter()
            .map(|c| UsedChunk {
                score: c.fused_score,
                tag: c.payload.tag(),
                source: c.payload.source,
                chunk_id: c.payload.chunk_id,
                text: c.payload.text,
            })
            .collect();

        Ok(QaAnswer { answer, context })
    }
}
