//! Word-window chunking.

use crate::record::Chunk;

/// Splits `text` into overlapping word windows.
///
/// Each chunk holds up to `window` whitespace-separated words, and
/// consecutive chunks share `overlap` words. Whitespace inside a chunk
/// is normalized to single spaces. Empty input yields no chunks.
pub fn chunk_text(source: &str, text: &str, window: usize, overlap: usize) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || window == 0 {
        return Vec::new();
    }

    // Guard against non-advancing windows.
    let step = window.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut chunk_id = 0u64;
    while start < words.len() {
        let end = (start + window).min(words.len());
        chunks.push(Chunk {
            source: source.to_string(),
            chunk_id,
            text: words[start..end].join(" "),
        });
        if end == words.len() {
            break;
        }
        start += step;
        chunk_id += 1;
    }
    chunks
}
