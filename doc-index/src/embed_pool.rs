//! Embedding executor with bounded concurrency.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::embed::EmbeddingsProvider;
use crate::error::IndexError;
use crate::record::Chunk;

/// Embeds a batch of chunks, preserving input order.
///
/// Runs up to `concurrency` embedding calls at once. The provider is
/// expected to enforce the vector dimension itself.
pub async fn embed_chunks(
    chunks: &[Chunk],
    provider: &dyn EmbeddingsProvider,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, IndexError> {
    info!(
        "embed_pool::embed_chunks: total={} concurrency={}",
        chunks.len(),
        concurrency
    );

    if chunks.is_empty() {
        debug!("embed_pool::embed_chunks: nothing to embed");
        return Ok(Vec::new());
    }

    let mut results: Vec<(usize, Vec<f32>)> = stream::iter(chunks.iter().enumerate())
        .map(|(i, chunk)| async move {
            let v = provider.embed(&chunk.text).await?;
            Ok::<(usize, Vec<f32>), IndexError>((i, v))
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, IndexError>>()?;

    results.sort_by_key(|(i, _)| *i);
    Ok(results.into_iter().map(|(_, v)| v).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use std::{future::Future, pin::Pin};

    /// Embeds `"N"` as `[N]`, finishing later for smaller N so that
    /// completion order is the reverse of input order.
    struct ReversingEmbedder;

    impl EmbeddingsProvider for ReversingEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
            let n: u64 = text.parse().unwrap();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis((3 - n) * 20)).await;
                Ok(vec![n as f32])
            })
        }
    }

    fn chunk(i: u64) -> Chunk {
        Chunk {
            source: "doc".into(),
            chunk_id: i,
            text: i.to_string(),
        }
    }

    #[tokio::test]
    async fn preserves_input_order_despite_completion_order() {
        let chunks = vec![chunk(0), chunk(1), chunk(2)];
        let out = embed_chunks(&chunks, &ReversingEmbedder, 3).await.unwrap();
        assert_eq!(out, vec![vec![0.0], vec![1.0], vec![2.0]]);
    }

    #[tokio::test]
    async fn empty_input_embeds_nothing() {
        let out = embed_chunks(&[], &ReversingEmbedder, 4).await.unwrap();
        assert!(out.is_empty());
    }
}
