//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! The collection carries two named vector spaces per point:
//! - `dense` for kNN search over embedding vectors
//! - `bm25`  for lexical search, a sparse IDF-modified space whose
//!   vectors the server infers from the raw chunk text
//!
//! Everything else in the crate talks to Qdrant through this facade.

use std::collections::HashMap;

use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, Document, Modifier, PointStruct, Query,
    QueryPointsBuilder, ScoredPoint, SparseVectorParamsBuilder, SparseVectorsConfigBuilder,
    Value as QValue, Vector, VectorParamsBuilder, VectorsConfigBuilder,
    point_id::PointIdOptions,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, IndexConfig};
use crate::error::IndexError;
use crate::record::{Chunk, RawHit, RetrievalHit, normalize_hit};

/// Name of the dense vector space.
pub const DENSE_VECTOR_NAME: &str = "dense";
/// Name of the sparse lexical vector space.
pub const BM25_VECTOR_NAME: &str = "bm25";
/// Server-side inference model used for the sparse space.
pub const BM25_MODEL: &str = "qdrant/bm25";

/// A facade over the Qdrant client.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
    embedding_dim: usize,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
            embedding_dim: cfg.embedding_dim,
        })
    }

    /// Ensures that the collection exists.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with both named vector spaces.
    pub async fn ensure_collection(&self) -> Result<(), IndexError> {
        info!(
            "Ensuring collection '{}' with dim={} distance={:?}",
            self.collection, self.embedding_dim, self.distance
        );

        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        let mut vectors = VectorsConfigBuilder::default();
        vectors.add_named_vector_params(
            DENSE_VECTOR_NAME,
            VectorParamsBuilder::new(self.embedding_dim as u64, distance),
        );

        let mut sparse = SparseVectorsConfigBuilder::default();
        sparse.add_named_vector_params(
            BM25_VECTOR_NAME,
            SparseVectorParamsBuilder::default().modifier(Modifier::Idf),
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors)
                    .sparse_vectors_config(sparse),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Upserts a batch of chunks with their dense embeddings.
    ///
    /// Each point stores the dense vector, a text document for the sparse
    /// space (inferred server-side), and the canonical payload. Stored
    /// payload text is truncated to `stored_text_max` characters.
    ///
    /// Returns the number of points sent.
    pub async fn upsert_chunks(
        &self,
        items: Vec<(Chunk, Vec<f32>)>,
        stored_text_max: usize,
    ) -> Result<u64, IndexError> {
        if items.is_empty() {
            debug!("No points provided for upsert");
            return Ok(0);
        }

        let mut points = Vec::with_capacity(items.len());
        for (chunk, embedding) in items {
            if embedding.len() != self.embedding_dim {
                return Err(IndexError::VectorSizeMismatch {
                    got: embedding.len(),
                    want: self.embedding_dim,
                });
            }

            let stored_text: String = chunk.text.chars().take(stored_text_max).collect();
            let payload: Payload = json!({
                "source": chunk.source,
                "chunk_id": chunk.chunk_id,
                "text": stored_text,
            })
            .try_into()
            .map_err(|e| IndexError::Qdrant(format!("payload conversion failed: {e}")))?;

            let vectors = HashMap::from([
                (DENSE_VECTOR_NAME.to_string(), Vector::from(embedding)),
                (
                    BM25_VECTOR_NAME.to_string(),
                    Vector::from(Document::new(chunk.text.clone(), BM25_MODEL)),
                ),
            ]);

            points.push(PointStruct::new(
                chunk.stable_id().to_string(),
                vectors,
                payload,
            ));
        }

        let count = points.len() as u64;
        info!(
            "Upserting {} points into collection '{}'",
            count, self.collection
        );

        use qdrant_client::qdrant::UpsertPointsBuilder;
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(count)
    }

    /// kNN search over the dense vector space.
    pub async fn dense_query(
        &self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<RetrievalHit>, IndexError> {
        if vector.len() != self.embedding_dim {
            return Err(IndexError::VectorSizeMismatch {
                got: vector.len(),
                want: self.embedding_dim,
            });
        }

        let req = QueryPointsBuilder::new(&self.collection)
            .query(Query::new_nearest(vector))
            .using(DENSE_VECTOR_NAME)
            .limit(limit)
            .with_payload(true);

        let res = self
            .client
            .query(req)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        debug!("Dense query returned {} hits", res.result.len());
        res.result.into_iter().map(scored_point_to_hit).collect()
    }

    /// Lexical search over the sparse space, inferring the query's sparse
    /// vector from the raw text on the server.
    pub async fn lexical_query(
        &self,
        text: &str,
        limit: u64,
    ) -> Result<Vec<RetrievalHit>, IndexError> {
        let req = QueryPointsBuilder::new(&self.collection)
            .query(Query::new_nearest(Document::new(text, BM25_MODEL)))
            .using(BM25_VECTOR_NAME)
            .limit(limit)
            .with_payload(true);

        let res = self
            .client
            .query(req)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        debug!("Lexical query returned {} hits", res.result.len());
        res.result.into_iter().map(scored_point_to_hit).collect()
    }
}

/// Maps a Qdrant [`ScoredPoint`] through the [`RawHit`] boundary into a
/// normalized hit.
fn scored_point_to_hit(p: ScoredPoint) -> Result<RetrievalHit, IndexError> {
    let id = match p.id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Uuid(u)) => serde_json::Value::String(u),
        Some(PointIdOptions::Num(n)) => serde_json::Value::Number(n.into()),
        None => {
            return Err(IndexError::UnrecognizedHit(
                "scored point without an id".into(),
            ));
        }
    };

    normalize_hit(RawHit::Record {
        id,
        score: p.score,
        payload: Some(qpayload_to_json(p.payload)),
        vector: None,
    })
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Unsupported nested objects/arrays are mapped to `Null`.
fn qpayload_to_json(mut p: HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            None => serde_json::Value::Null,
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
