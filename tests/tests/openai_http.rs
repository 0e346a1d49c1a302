use application::rag_service::RemoteRagService;
use domain::error::ProviderError;
use domain::models::{Answer, Document};
use domain::ports::Embedder;
use domain::submission::Submission;
use infrastructure::config::Config;
use infrastructure::embedder::RemoteEmbedder;
use infrastructure::openai_client::OpenAiClient;
use std::time::Duration;
use tests::stub_provider::{StubOptions, StubProvider};
use tests::{bag_of_words, test_key};

fn config_for(stub: &StubProvider) -> Config {
    Config {
        base_url: stub.base_url.clone(),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

fn submission(text: &str, question: &str, key: &str) -> Submission {
    Submission::new(Some(Document::new(text)), question, key)
}

#[tokio::test]
async fn answers_through_the_http_providers() {
    let stub = StubProvider::spawn(StubOptions::default()).await;
    let service = RemoteRagService::from_config(&config_for(&stub)).unwrap();

    let answer = service
        .answer(&submission(
            "The sky is blue. The grass is green.",
            "What color is the sky?",
            "sk-test",
        ))
        .await
        .unwrap();

    assert!(answer.text.contains("blue"), "answer was {:?}", answer.text);
    assert_eq!(answer.sources.len(), 1);
    // One request for the document, one for the question.
    assert_eq!(stub.embedding_requests(), 2);
    assert_eq!(stub.completion_requests(), 1);

    let prompt = stub.last_prompt().unwrap();
    assert!(prompt.contains("The sky is blue. The grass is green."));
    assert!(prompt.contains("Question: What color is the sky?"));
}

#[tokio::test]
async fn empty_document_makes_no_requests() {
    let stub = StubProvider::spawn(StubOptions::default()).await;
    let service = RemoteRagService::from_config(&config_for(&stub)).unwrap();

    let answer = service
        .answer(&submission("", "What is this about?", "sk-test"))
        .await
        .unwrap();

    assert_eq!(answer, Answer::no_context());
    assert_eq!(stub.embedding_requests(), 0);
    assert_eq!(stub.completion_requests(), 0);
}

#[tokio::test]
async fn malformed_key_never_hits_the_network() {
    let stub = StubProvider::spawn(StubOptions::default()).await;
    let service = RemoteRagService::from_config(&config_for(&stub)).unwrap();

    assert!(service
        .answer(&submission("The sky is blue.", "Color?", "not-a-key"))
        .await
        .is_err());
    assert_eq!(stub.embedding_requests(), 0);
    assert_eq!(stub.completion_requests(), 0);
}

#[tokio::test]
async fn rejected_key_surfaces_authentication_error() {
    let stub = StubProvider::spawn(StubOptions::default()).await;
    let service = RemoteRagService::from_config(&config_for(&stub)).unwrap();

    let err = service
        .answer(&submission("The sky is blue.", "Color?", "sk-revoked"))
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ProviderError>(),
        Some(&ProviderError::Authentication(
            "Incorrect API key provided".to_string()
        ))
    );
}

async fn provider_error_for(status: u16) -> ProviderError {
    let stub = StubProvider::spawn(StubOptions {
        fail_status: Some(status),
        ..StubOptions::default()
    })
    .await;
    let service = RemoteRagService::from_config(&config_for(&stub)).unwrap();

    let err = service
        .answer(&submission("The sky is blue.", "Color?", "sk-test"))
        .await
        .unwrap_err();
    err.downcast_ref::<ProviderError>()
        .cloned()
        .unwrap_or_else(|| panic!("{status}: not a provider error: {err:#}"))
}

#[tokio::test]
async fn status_codes_map_to_provider_errors() {
    assert!(matches!(provider_error_for(429).await, ProviderError::RateLimited(_)));
    assert!(matches!(provider_error_for(503).await, ProviderError::ServiceUnavailable(_)));
    assert_eq!(
        provider_error_for(400).await,
        ProviderError::Api {
            status: 400,
            message: "forced failure".to_string()
        }
    );
}

#[tokio::test]
async fn slow_provider_times_out() {
    let stub = StubProvider::spawn(StubOptions {
        delay: Some(Duration::from_secs(2)),
        ..StubOptions::default()
    })
    .await;
    let config = Config {
        request_timeout: Duration::from_millis(200),
        ..config_for(&stub)
    };
    let service = RemoteRagService::from_config(&config).unwrap();

    let err = service
        .answer(&submission("The sky is blue.", "Color?", "sk-test"))
        .await
        .unwrap_err();

    assert_eq!(err.downcast_ref::<ProviderError>(), Some(&ProviderError::Timeout));
}

#[tokio::test]
async fn batched_embeddings_keep_input_order() {
    let stub = StubProvider::spawn(StubOptions::default()).await;
    let client = OpenAiClient::new(stub.base_url.clone(), Duration::from_secs(5)).unwrap();
    let embedder = RemoteEmbedder::new(client, "text-embedding-ada-002", 2);
    let texts: Vec<String> = ["red apple", "green pear", "blue sky", "yellow sun", "white snow"]
        .into_iter()
        .map(String::from)
        .collect();

    let vectors = embedder.embed(&test_key(), &texts).await.unwrap();

    assert_eq!(stub.embedding_requests(), 3);
    assert_eq!(stub.embedded_texts(), 5);
    let expected: Vec<_> = texts.iter().map(|t| bag_of_words(t)).collect();
    assert_eq!(vectors, expected);
}

#[tokio::test]
async fn no_texts_means_no_request() {
    let stub = StubProvider::spawn(StubOptions::default()).await;
    let client = OpenAiClient::new(stub.base_url.clone(), Duration::from_secs(5)).unwrap();
    let embedder = RemoteEmbedder::new(client, "text-embedding-ada-002", 8);

    let vectors = embedder.embed(&test_key(), &[]).await.unwrap();

    assert!(vectors.is_empty());
    assert_eq!(stub.embedding_requests(), 0);
}
