//! Score fusion for hybrid retrieval.
//!
//! Lexical and dense result lists are merged per point id and ranked by
//! a fused score. Two strategies are supported: a weighted sum of the
//! backend-native scores, and reciprocal rank fusion (RRF), which only
//! looks at positions and is robust to incomparable score scales.

use doc_index::{ChunkPayload, RetrievalHit};

/// RRF smoothing constant. Standard value from the literature.
pub const RRF_K: f32 = 60.0;

/// How to combine lexical and dense scores for the same point.
#[derive(Clone, Copy, Debug)]
pub enum FusionStrategy {
    /// `fused = w_dense * dense + w_lexical * lexical`, missing sides
    /// contribute zero.
    WeightedScore { w_dense: f32, w_lexical: f32 },
    /// `fused = sum over lists of 1 / (k + rank)`, rank is 1-based.
    ReciprocalRank { k: f32 },
}

impl Default for FusionStrategy {
    fn default() -> Self {
        FusionStrategy::WeightedScore {
            w_dense: 0.55,
            w_lexical: 0.45,
        }
    }
}

/// A merged candidate carrying both per-list scores and the fused score.
#[derive(Clone, Debug)]
pub struct FusedCandidate {
    pub id: String,
    pub lexical_score: f32,
    pub dense_score: f32,
    pub fused_score: f32,
    pub payload: ChunkPayload,
}

/// Merges the two result lists and returns the top `top_k` candidates by
/// fused score, descending.
///
/// The payload of the first occurrence of an id wins (lexical list is
/// visited first). Ordering is stable: ties keep first-encountered
/// order.
pub fn fuse(
    lexical: &[RetrievalHit],
    dense: &[RetrievalHit],
    strategy: FusionStrategy,
    top_k: usize,
) -> Vec<FusedCandidate> {
    fn slot(
        order: &mut Vec<FusedCandidate>,
        index: &mut std::collections::HashMap<String, usize>,
        hit: &RetrievalHit,
    ) -> usize {
        *index.entry(hit.id.clone()).or_insert_with(|| {
            order.push(FusedCandidate {
                id: hit.id.clone(),
                lexical_score: 0.0,
                dense_score: 0.0,
                fused_score: 0.0,
                payload: hit.payload.clone(),
            });
            order.len() - 1
        })
    }

    let mut order: Vec<FusedCandidate> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for (rank, hit) in lexical.iter().enumerate() {
        let i = slot(&mut order, &mut index, hit);
        order[i].lexical_score = hit.score;
        if let FusionStrategy::ReciprocalRank { k } = strategy {
            order[i].fused_score += 1.0 / (k + (rank as f32 + 1.0));
        }
    }
    for (rank, hit) in dense.iter().enumerate() {
        let i = slot(&mut order, &mut index, hit);
        order[i].dense_score = hit.score;
        if let FusionStrategy::ReciprocalRank { k } = strategy {
            order[i].fused_score += 1.0 / (k + (rank as f32 + 1.0));
        }
    }

    if let FusionStrategy::WeightedScore { w_dense, w_lexical } = strategy {
        for c in &mut order {
            c.fused_score = w_dense * c.dense_score + w_lexical * c.lexical_score;
        }
    }

    // Vec::sort_by is stable, so ties keep insertion order.
    order.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(top_k);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, score: f32) -> RetrievalHit {
        RetrievalHit {
            id: id.to_string(),
            score,
            payload: ChunkPayload {
                source: format!("doc-{id}"),
                chunk_id: 0,
                text: String::new(),
            },
            vector: None,
        }
    }

    #[test]
    fn weighted_fusion_combines_both_lists() {
        let lexical = vec![hit("1", 10.0)];
        let dense = vec![hit("1", 0.8), hit("2", 0.6)];
        let out = fuse(&lexical, &dense, FusionStrategy::default(), 5);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "1");
        assert!((out[0].fused_score - 4.94).abs() < 1e-5);
        assert_eq!(out[1].id, "2");
        assert!((out[1].fused_score - 0.33).abs() < 1e-5);
    }

    #[test]
    fn disjoint_lists_concatenate_with_single_source_scores() {
        let lexical = vec![hit("l1", 2.0)];
        let dense = vec![hit("d1", 0.9)];
        let out = fuse(&lexical, &dense, FusionStrategy::default(), 5);

        assert_eq!(out.len(), 2);
        let l1 = out.iter().find(|c| c.id == "l1").unwrap();
        let d1 = out.iter().find(|c| c.id == "d1").unwrap();
        assert!((l1.fused_score - 0.45 * 2.0).abs() < 1e-6);
        assert!((d1.fused_score - 0.55 * 0.9).abs() < 1e-6);
    }

    #[test]
    fn missing_side_contributes_zero() {
        let out = fuse(&[], &[hit("a", 1.0)], FusionStrategy::default(), 5);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].lexical_score, 0.0);
        assert!((out[0].fused_score - 0.55).abs() < 1e-6);
    }

    #[test]
    fn top_k_truncates_after_ranking() {
        let dense = vec![hit("a", 0.3), hit("b", 0.9), hit("c", 0.5)];
        let out = fuse(&[], &dense, FusionStrategy::default(), 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "b");
        assert_eq!(out[1].id, "c");
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let lexical = vec![hit("x", 1.0), hit("y", 1.0)];
        let out = fuse(&lexical, &[], FusionStrategy::default(), 5);
        assert_eq!(out[0].id, "x");
        assert_eq!(out[1].id, "y");
    }

    #[test]
    fn rrf_uses_positions_not_scores() {
        // Wildly different score scales must not matter under RRF.
        let lexical = vec![hit("a", 1000.0), hit("b", 999.0)];
        let dense = vec![hit("b", 0.01), hit("c", 0.009)];
        let out = fuse(&lexical, &dense, FusionStrategy::ReciprocalRank { k: RRF_K }, 5);

        // b appears in both lists, so it wins.
        assert_eq!(out[0].id, "b");
        let expect_b = 1.0 / (RRF_K + 2.0) + 1.0 / (RRF_K + 1.0);
        assert!((out[0].fused_score - expect_b).abs() < 1e-6);
    }

    #[test]
    fn payload_of_first_occurrence_wins() {
        let mut l = hit("1", 2.0);
        l.payload.source = "from-lexical".into();
        let mut d = hit("1", 0.9);
        d.payload.source = "from-dense".into();
        let out = fuse(&[l], &[d], FusionStrategy::default(), 5);
        assert_eq!(out[0].payload.source, "from-lexical");
    }
}
