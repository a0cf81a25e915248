use std::collections::HashMap;

use super::domain::KnowledgeChunk;

/// Cosine similarity between two vectors; 0.0 for mismatched or empty
/// dimensions and for zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: KnowledgeChunk,
    embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: KnowledgeChunk,
    pub similarity: f32,
}

/// In-memory vector index performing an exhaustive cosine-similarity scan.
/// Appropriate at the scale of a small document set; rebuilds construct a
/// fresh index that the owner swaps in wholesale.
#[derive(Debug, Default, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert keyed by chunk id.
    pub fn store(&mut self, chunk: KnowledgeChunk, embedding: Vec<f32>) {
        match self.positions.get(&chunk.id) {
            Some(&position) => {
                self.entries[position] = IndexEntry { chunk, embedding };
            }
            None => {
                self.positions.insert(chunk.id.clone(), self.entries.len());
                self.entries.push(IndexEntry { chunk, embedding });
            }
        }
    }

    /// Exact top-k by similarity descending, filtered to `similarity >=
    /// threshold`. Ties keep insertion order; an empty index yields an empty
    /// result.
    pub fn search(&self, query: &[f32], k: usize, threshold: f32) -> Vec<ScoredChunk> {
        let mut hits: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(query, &entry.embedding),
            })
            .filter(|hit| hit.similarity >= threshold)
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &KnowledgeChunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }
}
