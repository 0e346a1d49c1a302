use domain::error::IndexError;
use domain::models::{IndexEntry, ScoredSegment};
use domain::ports::VectorIndex;
use shared::types::Result;
use std::cmp::Ordering;

/// Brute-force cosine index held in memory for a single request.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: Vec<IndexEntry>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|e| e.vector.len())
    }

    /// Cosine similarity; 0.0 when either vector has zero norm.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot_product / (norm_a * norm_b)
    }
}

impl VectorIndex for InMemoryIndex {
    fn build(&mut self, entries: Vec<IndexEntry>) -> Result<()> {
        if let Some(first) = entries.first() {
            let expected = first.vector.len();
            if let Some(bad) = entries.iter().find(|e| e.vector.len() != expected) {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: bad.vector.len(),
                }
                .into());
            }
        }
        self.entries = entries;
        tracing::debug!(entries = self.entries.len(), "built vector index");
        Ok(())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredSegment>> {
        if k == 0 {
            return Err(IndexError::InvalidK.into());
        }
        let Some(expected) = self.dimension() else {
            return Ok(Vec::new());
        };
        if vector.len() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }

        let mut similarities: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| {
                let score = Self::cosine_similarity(vector, &entry.vector);
                (if score.is_nan() { f32::NEG_INFINITY } else { score }, entry)
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        similarities.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        Ok(similarities
            .into_iter()
            .take(k)
            .map(|(score, entry)| ScoredSegment {
                segment: entry.segment.clone(),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
