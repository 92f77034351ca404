//! Public API types re-used by callers (CLI, future HTTP layer).

use serde::{Deserialize, Serialize};

/// Options that control retrieval for a single question.
///
/// Setting a field to `0` means: "use the value from env-config".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AskOptions {
    /// Final number of chunks passed to the model.
    /// If `0`, falls back to `RAG_TOP_K` from env.
    #[serde(default)]
    pub top_k: usize,
    /// Per-question token cap for the answer.
    /// If `0`, falls back to `MAX_ANSWER_TOKENS` from env.
    #[serde(default)]
    pub max_answer_tokens: u32,
}

/// A compact record of a context chunk that was fed to the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsedChunk {
    /// Fused relevance score.
    pub score: f32,
    /// Originating document.
    pub source: String,
    /// Chunk position within the document.
    pub chunk_id: u64,
    /// Citation tag, `"{source}|chunk:{chunk_id}"`.
    pub tag: String,
    /// Stored chunk text.
    pub text: String,
}

/// Final answer together with the exact context passed to the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<UsedChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_options_tolerate_partial_json() {
        let opts: AskOptions = serde_json::from_str(r#"{ "top_k": 3 }"#).unwrap();
        assert_eq!(opts.top_k, 3);
        assert_eq!(opts.max_answer_tokens, 0);
    }

    #[test]
    fn qa_answer_serializes_with_context() {
        let qa = QaAnswer {
            answer: "42 [DOC:a.md|chunk:0]".into(),
            context: vec![UsedChunk {
                score: 0.9,
                source: "a.md".into(),
                chunk_id: 0,
                tag: "a.md|chunk:0".into(),
                text: "body".into(),
            }],
        };
        let json = serde_json::to_value(&qa).unwrap();
        assert_eq!(json["context"][0]["tag"], "a.md|chunk:0");
        assert_eq!(json["answer"], "42 [DOC:a.md|chunk:0]");
    }
}
