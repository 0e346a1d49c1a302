use super::openai_client::OpenAiClient;
use crate::config::Config;
use domain::credential::ApiKey;
use domain::error::ProviderError;
use domain::models::EmbeddingVector;
use domain::ports::Embedder;
use shared::types::Result;

pub struct RemoteEmbedder {
    client: OpenAiClient,
    model: String,
    batch_size: usize,
}

impl RemoteEmbedder {
    pub fn new(client: OpenAiClient, model: impl Into<String>, batch_size: usize) -> Self {
        Self {
            client,
            model: model.into(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(client: OpenAiClient, config: &Config) -> Self {
        Self::new(client, config.embedding_model.clone(), config.embed_batch_size)
    }
}

impl Embedder for RemoteEmbedder {
    async fn embed(&self, key: &ApiKey, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            tracing::debug!(batch = batch.len(), model = %self.model, "requesting embeddings");
            let vectors = self.client.create_embeddings(key, &self.model, batch).await?;
            embeddings.extend(vectors);
        }

        if let Some(first) = embeddings.first() {
            let dimension = first.len();
            if embeddings.iter().any(|v| v.len() != dimension) {
                return Err(ProviderError::MalformedResponse(
                    "embeddings have inconsistent dimensions".to_string(),
                )
                .into());
            }
        }
        Ok(embeddings)
    }
}
