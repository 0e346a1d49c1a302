use domain::credential::ApiKey;
use domain::error::ProviderError;
use domain::models::{Query, ScoredSegment};
use domain::ports::{Embedder, VectorIndex};
use shared::types::Result;

pub struct Retriever<'a, E, I> {
    embedder: &'a E,
    index: &'a I,
    top_k: usize,
}

impl<'a, E: Embedder, I: VectorIndex> Retriever<'a, E, I> {
    pub fn new(embedder: &'a E, index: &'a I, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    pub async fn retrieve(&self, key: &ApiKey, question: &str) -> Result<Vec<ScoredSegment>> {
        // Nothing can match, so skip the embedding call.
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embed_query(key, question).await?;
        let matches = self.index.query(&query.vector, self.top_k)?;
        tracing::debug!(question = %query.text, k = self.top_k, matches = matches.len(), "retrieved segments");
        Ok(matches)
    }

    async fn embed_query(&self, key: &ApiKey, question: &str) -> Result<Query> {
        let vectors = self.embedder.embed(key, &[question.to_string()]).await?;
        let vector = vectors.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("no embedding returned for the question".to_string())
        })?;
        Ok(Query {
            text: question.to_string(),
            vector,
        })
    }
}
