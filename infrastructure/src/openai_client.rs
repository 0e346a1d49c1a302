use crate::config::Config;
use domain::credential::ApiKey;
use domain::error::ProviderError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Arc<Client>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_embeddings(
        &self,
        key: &ApiKey,
        model: &str,
        input: &[String],
    ) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest { model, input };
        let response: EmbeddingResponse = self.post_json(key, "embeddings", &request).await?;
        Ok(order_embeddings(response.data, input.len())?)
    }

    pub async fn create_completion(
        &self,
        key: &ApiKey,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = CompletionRequest {
            model,
            prompt,
            temperature,
            max_tokens,
        };
        let response: CompletionResponse = self.post_json(key, "completions", &request).await?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("completion response had no choices".to_string())
        })?;
        Ok(choice.text)
    }

    async fn post_json<Req, Resp>(&self, key: &ApiKey, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "provider request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(key.expose())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "provider rejected request");
            return Err(ProviderError::from_status(status.as_u16(), error_message(&text)).into());
        }

        serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()).into())
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::ServiceUnavailable(err.to_string())
    }
}

/// Prefer the provider's `{"error": {"message": ..}}` text over the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

/// Put embeddings back in request order and check one came back per input.
fn order_embeddings(
    mut data: Vec<EmbeddingData>,
    expected: usize,
) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
    if data.len() != expected {
        return Err(ProviderError::MalformedResponse(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(ProviderError::MalformedResponse(
            "embedding indices do not cover the request".to_string(),
        ));
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
