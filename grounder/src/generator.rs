//! Grounded answer generation with citation checking.
//!
//! The model only sees the retrieved chunks, each prefixed with a
//! `[DOC:source|chunk:N]` tag, and is instructed to cite those tags. Any
//! citation in the answer that does not match a retrieved chunk triggers
//! a visible warning suffix.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::GrounderError;
use crate::fusion::FusedCandidate;
use crate::llm::TextGenerator;

/// Returned verbatim when no context is available or the model cannot
/// answer from it.
pub const NO_ANSWER_FALLBACK: &str = "Insufficient information in the provided documents.";

/// Appended to answers that cite tags absent from the retrieved context.
pub const CITATION_WARNING: &str =
    "[WARNING] One or more citations do not appear in the retrieved context; \
     verify the answer carefully.";

fn citation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[DOC:([^\]]+)\]").unwrap())
}

/// Generator that answers strictly from retrieved context.
pub struct GroundedGenerator {
    llm: Arc<dyn TextGenerator>,
    max_tokens: Option<u32>,
}

impl GroundedGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>, max_tokens: Option<u32>) -> Self {
        Self { llm, max_tokens }
    }

    /// Produces the final answer for `question` given the fused candidates.
    ///
    /// `max_tokens` overrides the generator's default cap for this call.
    /// An empty candidate list still goes to the model with an empty
    /// context block; the prompt instructs it to emit the fallback phrase.
    /// The answer is citation-checked and, when it cites unknown tags,
    /// suffixed with [`CITATION_WARNING`].
    pub async fn generate(
        &self,
        question: &str,
        candidates: &[FusedCandidate],
        max_tokens: Option<u32>,
    ) -> Result<String, GrounderError> {
        if candidates.is_empty() {
            debug!("generating with empty context");
        }

        let context = build_context_block(candidates);
        let prompt = build_prompt(question, &context);
        let answer = self
            .llm
            .generate(&prompt, max_tokens.or(self.max_tokens))
            .await?;

        let valid: HashSet<String> = candidates.iter().map(|c| c.payload.tag()).collect();
        let cited = extract_citations(&answer);

        if !cited.is_empty() && cited.iter().any(|t| !valid.contains(t)) {
            warn!("answer cites tags outside the retrieved context");
            return Ok(format!("{answer}\n\n{CITATION_WARNING}"));
        }
        Ok(answer)
    }
}

/// Renders candidates as tagged context blocks separated by `---` lines.
pub fn build_context_block(candidates: &[FusedCandidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("[DOC:{}]\n{}", c.payload.tag(), c.payload.text))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Builds the restrictive QA prompt.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Answer the question using ONLY the context below. \
         Cite supporting passages with their [DOC:...] tags. \
         If the context does not contain the answer, reply exactly: \
         {NO_ANSWER_FALLBACK}\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\
         Answer:"
    )
}

/// All `[DOC:...]` tags cited in an answer, in order of appearance.
pub fn extract_citations(answer: &str) -> Vec<String> {
    citation_re()
        .captures_iter(answer)
        .map(|c| c[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::FusedCandidate;
    use doc_index::ChunkPayload;
    use std::{future::Future, pin::Pin};

    struct CannedLlm {
        reply: String,
    }

    impl TextGenerator for CannedLlm {
        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
            _max_tokens: Option<u32>,
        ) -> Pin<Box<dyn Future<Output = Result<String, GrounderError>> + Send + 'a>> {
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }
    }

    fn candidate(source: &str, chunk_id: u64, text: &str) -> FusedCandidate {
        FusedCandidate {
            id: format!("{source}-{chunk_id}"),
            lexical_score: 0.0,
            dense_score: 0.0,
            fused_score: 1.0,
            payload: ChunkPayload {
                source: source.to_string(),
                chunk_id,
                text: text.to_string(),
            },
        }
    }

    fn generator(reply: &str) -> GroundedGenerator {
        GroundedGenerator::new(
            Arc::new(CannedLlm {
                reply: reply.to_string(),
            }),
            Some(256),
        )
    }

    #[test]
    fn context_block_tags_and_separates_chunks() {
        let ctx = build_context_block(&[
            candidate("a.md", 0, "first"),
            candidate("b.md", 2, "second"),
        ]);
        assert_eq!(ctx, "[DOC:a.md|chunk:0]\nfirst\n---\n[DOC:b.md|chunk:2]\nsecond");
    }

    #[test]
    fn extracts_citations_in_order() {
        let cited = extract_citations("see [DOC:a|chunk:1] and [DOC:b|chunk:2].");
        assert_eq!(cited, vec!["a|chunk:1", "b|chunk:2"]);
    }

    #[tokio::test]
    async fn empty_context_still_prompts_the_model() {
        let g = generator(NO_ANSWER_FALLBACK);
        let out = g.generate("q", &[], None).await.unwrap();
        assert_eq!(out, NO_ANSWER_FALLBACK);
    }

    #[test]
    fn prompt_names_fallback_and_embeds_context() {
        let prompt = build_prompt("who?", "[DOC:a.md|chunk:0]\nbody");
        assert!(prompt.contains(NO_ANSWER_FALLBACK));
        assert!(prompt.contains("[DOC:a.md|chunk:0]\nbody"));
        assert!(prompt.contains("Question: who?"));
    }

    #[tokio::test]
    async fn valid_citations_pass_unchanged() {
        let g = generator("The answer is 42 [DOC:a.md|chunk:0].");
        let out = g
            .generate("q", &[candidate("a.md", 0, "answer text")], None)
            .await
            .unwrap();
        assert_eq!(out, "The answer is 42 [DOC:a.md|chunk:0].");
    }

    #[tokio::test]
    async fn unknown_citation_appends_warning() {
        let g = generator("Made up [DOC:ghost.md|chunk:9].");
        let out = g
            .generate("q", &[candidate("a.md", 0, "answer text")], None)
            .await
            .unwrap();
        assert!(out.starts_with("Made up"));
        assert!(out.ends_with(CITATION_WARNING));
    }

    #[tokio::test]
    async fn uncited_answer_gets_no_warning() {
        let g = generator("A plain answer without citations.");
        let out = g
            .generate("q", &[candidate("a.md", 0, "answer text")], None)
            .await
            .unwrap();
        assert_eq!(out, "A plain answer without citations.");
    }
}
