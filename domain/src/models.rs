use serde::{Deserialize, Serialize};

pub type EmbeddingVector = Vec<f32>;

/// The uploaded text. Lives for one submission only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub ordinal: usize,
    /// Byte offset of the first character within the document.
    pub start_offset: usize,
    pub text: String,
}

impl Segment {
    pub fn new(ordinal: usize, start_offset: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            start_offset,
            text: text.into(),
        }
    }

    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub segment: Segment,
    pub vector: EmbeddingVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub vector: EmbeddingVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    pub segment: Segment,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Segments the answer was generated from, best match first.
    pub sources: Vec<ScoredSegment>,
}

impl Answer {
    pub const NO_CONTEXT: &'static str = "The document contains no text to answer from.";

    /// Answer returned without calling the model when retrieval found nothing.
    pub fn no_context() -> Self {
        Self {
            text: Self::NO_CONTEXT.to_string(),
            sources: Vec::new(),
        }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}
