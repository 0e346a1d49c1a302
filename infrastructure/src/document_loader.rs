use domain::error::InputError;
use domain::models::Document;
use memmap2::Mmap;
use shared::types::Result;
use shared::utils::is_supported_document;
use std::fs::File;
use std::path::Path;

pub struct DocumentLoader {
    max_file_bytes: u64,
}

impl DocumentLoader {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    pub fn load(&self, path: &Path) -> Result<Document> {
        let shown = path.to_string_lossy().to_string();
        if !is_supported_document(path) {
            return Err(InputError::UnsupportedFile { path: shown }.into());
        }

        let file = File::open(path)?;
        let size = file.metadata()?.len();
        if size > self.max_file_bytes {
            return Err(InputError::FileTooLarge {
                path: shown,
                size,
                limit: self.max_file_bytes,
            }
            .into());
        }
        if size == 0 {
            return Ok(Document::new(String::new()));
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let document = decode(&mmap)?;
        tracing::info!(path = %shown, bytes = document.len(), "loaded document");
        Ok(document)
    }
}

/// Strict UTF-8 decode. Invalid input is rejected, not replaced.
pub fn decode(bytes: &[u8]) -> std::result::Result<Document, InputError> {
    let text = std::str::from_utf8(bytes).map_err(|e| InputError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    Ok(Document::new(text))
}
