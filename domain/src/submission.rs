use crate::error::InputError;
use crate::models::Document;

#[derive(Clone)]
pub struct Submission {
    pub document: Option<Document>,
    pub question: String,
    pub api_key: String,
}

impl Submission {
    pub fn new(document: Option<Document>, question: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            document,
            question: question.into(),
            api_key: api_key.into(),
        }
    }

    /// The document and trimmed question, or the first missing input.
    pub fn inputs(&self) -> Result<(&Document, &str), InputError> {
        let document = self.document.as_ref().ok_or(InputError::MissingDocument)?;
        let question = self.question.trim();
        if question.is_empty() {
            return Err(InputError::MissingQuestion);
        }
        Ok((document, question))
    }
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("document_bytes", &self.document.as_ref().map(Document::len))
            .field("question", &self.question)
            .field("api_key", &"***")
            .finish()
    }
}
