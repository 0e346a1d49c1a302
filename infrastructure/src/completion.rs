use super::openai_client::OpenAiClient;
use crate::config::Config;
use domain::credential::ApiKey;
use domain::models::Segment;
use domain::ports::AnswerGenerator;
use domain::prompt::stuff_prompt;
use shared::types::Result;

pub struct CompletionGenerator {
    client: OpenAiClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionGenerator {
    pub fn new(client: OpenAiClient, model: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    pub fn from_config(client: OpenAiClient, config: &Config) -> Self {
        Self::new(
            client,
            config.completion_model.clone(),
            config.temperature,
            config.max_tokens,
        )
    }
}

impl AnswerGenerator for CompletionGenerator {
    async fn generate(&self, key: &ApiKey, segments: &[Segment], question: &str) -> Result<String> {
        let prompt = stuff_prompt(segments, question);
        tracing::debug!(
            model = %self.model,
            segments = segments.len(),
            prompt_chars = prompt.chars().count(),
            "requesting completion"
        );
        self.client
            .create_completion(key, &self.model, &prompt, self.temperature, self.max_tokens)
            .await
    }
}
