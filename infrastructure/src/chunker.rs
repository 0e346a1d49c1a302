use crate::config::Config;
use domain::error::ChunkingError;
use domain::models::Segment;
use domain::ports::Chunker;

pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Fixed-size character windows with optional overlap. A window that contains
/// the separator ends just after its last occurrence, as long as the cut
/// still moves past the overlap.
#[derive(Debug, Clone)]
pub struct CharacterChunker {
    chunk_size: usize,
    overlap: usize,
    separator: Option<String>,
}

impl CharacterChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkingError> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(ChunkingError::InvalidConfig {
                chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
            separator: None,
        })
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.separator = (!separator.is_empty()).then_some(separator);
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, ChunkingError> {
        Ok(Self::new(config.chunk_size, config.chunk_overlap)?.with_separator(DEFAULT_SEPARATOR))
    }

    /// Char index just past the last separator in `[start, end)`.
    fn separator_cut(&self, text: &str, bounds: &[usize], start: usize, end: usize) -> Option<usize> {
        let separator = self.separator.as_deref()?;
        let window = &text[bounds[start]..bounds[end]];
        let pos = window.rfind(separator)?;
        let cut_byte = bounds[start] + pos + separator.len();
        let cut = bounds.binary_search(&cut_byte).ok()?;
        (cut > start + self.overlap).then_some(cut)
    }
}

impl Chunker for CharacterChunker {
    fn chunk(&self, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }

        // bounds[i] is the byte offset of char i; the last entry is text.len().
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;
        let stride = self.chunk_size - self.overlap;
        let mut segments = Vec::with_capacity(total / stride + 1);
        let mut start = 0;

        loop {
            let mut end = (start + self.chunk_size).min(total);
            if end < total {
                if let Some(cut) = self.separator_cut(text, &bounds, start, end) {
                    end = cut;
                }
            }

            segments.push(Segment::new(
                segments.len(),
                bounds[start],
                &text[bounds[start]..bounds[end]],
            ));

            if end == total {
                break;
            }
            start = end - self.overlap;
        }

        tracing::debug!(
            chars = total,
            segments = segments.len(),
            chunk_size = self.chunk_size,
            overlap = self.overlap,
            "chunked document"
        );
        segments
    }
}
