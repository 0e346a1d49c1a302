use crate::retriever::Retriever;
use domain::credential::{ApiKey, CredentialPolicy};
use domain::error::ProviderError;
use domain::models::{Answer, IndexEntry, Segment};
use domain::ports::{AnswerGenerator, Chunker, Embedder, VectorIndex};
use domain::submission::Submission;
use infrastructure::chunker::CharacterChunker;
use infrastructure::completion::CompletionGenerator;
use infrastructure::config::Config;
use infrastructure::embedder::RemoteEmbedder;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::vector_index::InMemoryIndex;
use shared::telemetry::Telemetry;
use shared::types::Result;

/// Nothing is kept between calls to [`RagService::answer`]; every call
/// builds a fresh index of type `I`.
pub struct RagService<C, E, G, I = InMemoryIndex> {
    chunker: C,
    embedder: E,
    generator: G,
    policy: CredentialPolicy,
    top_k: usize,
    _index: std::marker::PhantomData<fn() -> I>,
}

pub type RemoteRagService = RagService<CharacterChunker, RemoteEmbedder, CompletionGenerator>;

impl RemoteRagService {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OpenAiClient::from_config(config)?;
        Ok(RagService::new(
            CharacterChunker::from_config(config)?,
            RemoteEmbedder::from_config(client.clone(), config),
            CompletionGenerator::from_config(client, config),
            CredentialPolicy::new(config.key_prefix.clone()),
            config.top_k,
        ))
    }
}

impl<C, E, G, I> RagService<C, E, G, I>
where
    C: Chunker,
    E: Embedder,
    G: AnswerGenerator,
    I: VectorIndex + Default,
{
    pub fn new(chunker: C, embedder: E, generator: G, policy: CredentialPolicy, top_k: usize) -> Self {
        Self {
            chunker,
            embedder,
            generator,
            policy,
            top_k: top_k.max(1),
            _index: std::marker::PhantomData,
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn answer(&self, submission: &Submission) -> Result<Answer> {
        let (document, question) = submission.inputs()?;
        // Checked before anything is sent to the provider.
        let key = self.policy.admit(&submission.api_key)?;
        let telemetry = Telemetry::new();

        let segments = self.chunker.chunk(document.text());
        tracing::info!(
            bytes = document.len(),
            segments = segments.len(),
            "split document"
        );

        let index = self.build_index(&key, segments).await?;
        tracing::info!(entries = index.len(), elapsed_ms = telemetry.elapsed_ms(), "indexed document");

        let matches = Retriever::new(&self.embedder, &index, self.top_k)
            .retrieve(&key, question)
            .await?;
        if matches.is_empty() {
            tracing::info!("no context retrieved, skipping completion");
            return Ok(Answer::no_context());
        }

        let context: Vec<Segment> = matches.iter().map(|m| m.segment.clone()).collect();
        let text = self.generator.generate(&key, &context, question).await?;
        tracing::info!(
            sources = matches.len(),
            elapsed_ms = telemetry.elapsed_ms(),
            "generated answer"
        );

        Ok(Answer {
            text,
            sources: matches,
        })
    }

    async fn build_index(&self, key: &ApiKey, segments: Vec<Segment>) -> Result<I> {
        let mut index = I::default();
        if segments.is_empty() {
            index.build(Vec::new())?;
            return Ok(index);
        }

        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let vectors = self.embedder.embed(key, &texts).await?;
        if vectors.len() != segments.len() {
            return Err(ProviderError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                segments.len(),
                vectors.len()
            ))
            .into());
        }

        let entries = segments
            .into_iter()
            .zip(vectors)
            .map(|(segment, vector)| IndexEntry { segment, vector })
            .collect();
        index.build(entries)?;
        Ok(index)
    }
}
