//! Core data model: chunks, payloads and search-hit normalization.
//!
//! Search backends may report hits in more than one shape (a full record
//! with named fields, or a positional tuple). Everything downstream of
//! this module works with one canonical [`RetrievalHit`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::IndexError;

/// A contiguous slice of a source document.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Identifier of the originating document (file stem or logical name).
    pub source: String,
    /// Zero-based position of this chunk within its document.
    pub chunk_id: u64,
    /// The chunk text.
    pub text: String,
}

impl Chunk {
    /// Stable, deterministic point id for this chunk.
    ///
    /// Derived as a UUIDv5 of `"{source}#{chunk_id}"`, so re-ingesting
    /// the same document overwrites its previous points instead of
    /// duplicating them.
    pub fn stable_id(&self) -> Uuid {
        stable_point_id(&self.source, self.chunk_id)
    }

    /// Citation tag for this chunk, `"{source}|chunk:{chunk_id}"`.
    pub fn tag(&self) -> String {
        format!("{}|chunk:{}", self.source, self.chunk_id)
    }
}

/// UUIDv5 of `"{source}#{chunk_id}"` in the URL namespace.
pub fn stable_point_id(source: &str, chunk_id: u64) -> Uuid {
    let key = format!("{source}#{chunk_id}");
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}

/// Canonical payload stored alongside every point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Originating document.
    pub source: String,
    /// Zero-based chunk position within the document.
    pub chunk_id: u64,
    /// Stored chunk text, possibly truncated at ingest time.
    pub text: String,
}

impl ChunkPayload {
    /// Builds a payload from arbitrary JSON, tolerating older key names.
    ///
    /// Older collections used `doc_id` for the source and `chunk` for the
    /// position. Missing fields fall back to `"unknown"` / `0` / `""`.
    pub fn from_json(value: &Value) -> Self {
        let source = value
            .get("source")
            .or_else(|| value.get("doc_id"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let chunk_id = value
            .get("chunk_id")
            .or_else(|| value.get("chunk"))
            .and_then(Value::as_u64)
            .unwrap_or(0);

        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            source,
            chunk_id,
            text,
        }
    }

    /// Citation tag, `"{source}|chunk:{chunk_id}"`.
    pub fn tag(&self) -> String {
        format!("{}|chunk:{}", self.source, self.chunk_id)
    }
}

/// A raw hit as reported by a search backend, before normalization.
///
/// Deserializes either a record `{id, score, payload, vector}` or a
/// positional tuple `[id, score, payload?, vector?]`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawHit {
    /// Record shape with named fields.
    Record {
        id: Value,
        score: f32,
        #[serde(default)]
        payload: Option<Value>,
        #[serde(default)]
        vector: Option<Vec<f32>>,
    },
    /// Positional shape. Elements past the second are optional.
    Tuple(Vec<Value>),
}

/// Normalized hit consumed by retrieval and fusion.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalHit {
    /// Point id rendered as a string (uuid or integer).
    pub id: String,
    /// Backend-native relevance score.
    pub score: f32,
    /// Canonical payload (legacy keys already mapped).
    pub payload: ChunkPayload,
    /// Dense vector, when the backend returned one.
    pub vector: Option<Vec<f32>>,
}

/// Normalizes a [`RawHit`] into a [`RetrievalHit`].
///
/// Tuples shorter than two elements, non-scalar ids and non-numeric
/// scores are rejected with [`IndexError::UnrecognizedHit`].
pub fn normalize_hit(raw: RawHit) -> Result<RetrievalHit, IndexError> {
    match raw {
        RawHit::Record {
            id,
            score,
            payload,
            vector,
        } => Ok(RetrievalHit {
            id: id_to_string(&id)?,
            score,
            payload: payload
                .as_ref()
                .map(ChunkPayload::from_json)
                .unwrap_or_default(),
            vector,
        }),
        RawHit::Tuple(items) => {
            if items.len() < 2 {
                return Err(IndexError::UnrecognizedHit(format!(
                    "tuple hit with {} elements, need at least (id, score)",
                    items.len()
                )));
            }
            let id = id_to_string(&items[0])?;
            let score = items[1].as_f64().ok_or_else(|| {
                IndexError::UnrecognizedHit(format!("non-numeric score: {}", items[1]))
            })? as f32;
            let payload = items
                .get(2)
                .filter(|v| !v.is_null())
                .map(ChunkPayload::from_json)
                .unwrap_or_default();
            let vector = items
                .get(3)
                .and_then(|v| serde_json::from_value::<Vec<f32>>(v.clone()).ok());
            Ok(RetrievalHit {
                id,
                score,
                payload,
                vector,
            })
        }
    }
}

fn id_to_string(id: &Value) -> Result<String, IndexError> {
    match id {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(IndexError::UnrecognizedHit(format!(
            "unsupported id type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stable_id_is_deterministic() {
        let a = stable_point_id("paper.md", 3);
        let b = stable_point_id("paper.md", 3);
        let c = stable_point_id("paper.md", 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn payload_maps_legacy_keys() {
        let p = ChunkPayload::from_json(&json!({
            "doc_id": "old.txt",
            "chunk": 7,
            "text": "body"
        }));
        assert_eq!(p.source, "old.txt");
        assert_eq!(p.chunk_id, 7);
        assert_eq!(p.tag(), "old.txt|chunk:7");
    }

    #[test]
    fn payload_defaults_when_fields_missing() {
        let p = ChunkPayload::from_json(&json!({ "text": "x" }));
        assert_eq!(p.source, "unknown");
        assert_eq!(p.chunk_id, 0);
    }

    #[test]
    fn normalizes_record_hit() {
        let raw: RawHit = serde_json::from_value(json!({
            "id": "abc",
            "score": 0.5,
            "payload": { "source": "a.md", "chunk_id": 1, "text": "t" }
        }))
        .unwrap();
        let hit = normalize_hit(raw).unwrap();
        assert_eq!(hit.id, "abc");
        assert_eq!(hit.payload.source, "a.md");
        assert!(hit.vector.is_none());
    }

    #[test]
    fn normalizes_short_tuple_hit() {
        let raw: RawHit = serde_json::from_value(json!([42, 0.9])).unwrap();
        let hit = normalize_hit(raw).unwrap();
        assert_eq!(hit.id, "42");
        assert_eq!(hit.score, 0.9);
        assert_eq!(hit.payload.source, "unknown");
    }

    #[test]
    fn normalizes_full_tuple_hit() {
        let raw: RawHit = serde_json::from_value(json!([
            "pt-1",
            0.7,
            { "source": "c.md", "chunk_id": 5, "text": "t" },
            [0.1, 0.2]
        ]))
        .unwrap();
        let hit = normalize_hit(raw).unwrap();
        assert_eq!(hit.id, "pt-1");
        assert_eq!(hit.payload.chunk_id, 5);
        assert_eq!(hit.vector, Some(vec![0.1, 0.2]));
    }

    #[test]
    fn normalizes_three_tuple_without_vector() {
        let raw: RawHit =
            serde_json::from_value(json!(["pt-2", 0.4, { "text": "x" }])).unwrap();
        let hit = normalize_hit(raw).unwrap();
        assert_eq!(hit.payload.text, "x");
        assert!(hit.vector.is_none());
    }

    #[test]
    fn rejects_unusable_tuple() {
        let raw: RawHit = serde_json::from_value(json!(["only-id"])).unwrap();
        assert!(matches!(
            normalize_hit(raw),
            Err(IndexError::UnrecognizedHit(_))
        ));
    }
}
