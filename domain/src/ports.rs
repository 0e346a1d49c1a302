//! Seams between the pipeline and its collaborators. Each stage can be
//! replaced by a stub in tests.

use crate::credential::ApiKey;
use crate::models::{EmbeddingVector, IndexEntry, ScoredSegment, Segment};
use shared::types::Result;

pub trait Chunker {
    fn chunk(&self, text: &str) -> Vec<Segment>;
}

/// Turns texts into vectors, one per input and in input order.
pub trait Embedder {
    fn embed(
        &self,
        key: &ApiKey,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<EmbeddingVector>>> + Send;
}

pub trait VectorIndex {
    fn build(&mut self, entries: Vec<IndexEntry>) -> Result<()>;

    /// At most `k` segments, best match first, ties in insertion order.
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredSegment>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait AnswerGenerator {
    fn generate(
        &self,
        key: &ApiKey,
        segments: &[Segment],
        question: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
