use crate::{bag_of_words, best_sentence};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone, Debug)]
pub struct StubOptions {
    /// Bearer token the stub accepts; anything else gets a 401.
    pub valid_key: String,
    /// Answer every request with this status instead of a result.
    pub fail_status: Option<u16>,
    pub delay: Option<Duration>,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            valid_key: "sk-test".to_string(),
            fail_status: None,
            delay: None,
        }
    }
}

#[derive(Default)]
pub struct StubLog {
    pub embedding_requests: AtomicUsize,
    pub embedded_texts: AtomicUsize,
    pub completion_requests: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

struct StubState {
    options: StubOptions,
    log: Arc<StubLog>,
}

#[derive(Deserialize)]
struct EmbeddingBody {
    input: Vec<String>,
}

#[derive(Deserialize)]
struct CompletionBody {
    prompt: String,
}

/// An OpenAI look-alike bound to an ephemeral localhost port.
pub struct StubProvider {
    pub base_url: String,
    pub log: Arc<StubLog>,
    handle: JoinHandle<()>,
}

impl StubProvider {
    pub async fn spawn(options: StubOptions) -> Self {
        let log = Arc::new(StubLog::default());
        let state = Arc::new(StubState {
            options,
            log: log.clone(),
        });
        let app = Router::new()
            .route("/v1/embeddings", post(embeddings))
            .route("/v1/completions", post(completions))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub provider");
        let addr = listener.local_addr().expect("stub provider address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            log,
            handle,
        }
    }

    pub fn embedding_requests(&self) -> usize {
        self.log.embedding_requests.load(Ordering::SeqCst)
    }

    pub fn embedded_texts(&self) -> usize {
        self.log.embedded_texts.load(Ordering::SeqCst)
    }

    pub fn completion_requests(&self) -> usize {
        self.log.completion_requests.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.log.last_prompt.lock().unwrap().clone()
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message, "type": "stub_error" } }))).into_response()
}

/// Shared preamble for both routes: delay, auth and forced failures.
async fn precheck(state: &StubState, headers: &HeaderMap) -> Option<Response> {
    if let Some(delay) = state.options.delay {
        tokio::time::sleep(delay).await;
    }
    let expected = format!("Bearer {}", state.options.valid_key);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return Some(error_response(StatusCode::UNAUTHORIZED, "Incorrect API key provided"));
    }
    if let Some(code) = state.options.fail_status {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Some(error_response(status, "forced failure"));
    }
    None
}

async fn embeddings(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<EmbeddingBody>,
) -> Response {
    if let Some(rejection) = precheck(&state, &headers).await {
        return rejection;
    }
    state.log.embedding_requests.fetch_add(1, Ordering::SeqCst);
    state
        .log
        .embedded_texts
        .fetch_add(body.input.len(), Ordering::SeqCst);

    // Reversed on purpose: clients must reorder by `index`.
    let data: Vec<_> = body
        .input
        .iter()
        .enumerate()
        .rev()
        .map(|(index, text)| json!({ "object": "embedding", "index": index, "embedding": bag_of_words(text) }))
        .collect();
    Json(json!({ "object": "list", "data": data })).into_response()
}

async fn completions(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<CompletionBody>,
) -> Response {
    if let Some(rejection) = precheck(&state, &headers).await {
        return rejection;
    }
    state.log.completion_requests.fetch_add(1, Ordering::SeqCst);
    *state.log.last_prompt.lock().unwrap() = Some(body.prompt.clone());

    let (context, question) = split_prompt(&body.prompt);
    let text = best_sentence(context, question).unwrap_or_else(|| "I don't know.".to_string());
    Json(json!({ "object": "text_completion", "choices": [{ "text": format!(" {text}"), "index": 0 }] }))
        .into_response()
}

/// Pull the context block and the question back out of a stuffed prompt.
fn split_prompt(prompt: &str) -> (&str, &str) {
    let body = prompt.split_once("\n\n").map(|(_, rest)| rest).unwrap_or(prompt);
    match body.rsplit_once("\n\nQuestion: ") {
        Some((context, tail)) => (context, tail.trim_end_matches("\nHelpful Answer:")),
        None => (body, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Segment;
    use domain::prompt::stuff_prompt;

    #[test]
    fn split_prompt_inverts_stuffing() {
        let prompt = stuff_prompt(
            &[Segment::new(0, 0, "The sky is blue."), Segment::new(1, 16, "Grass is green.")],
            "What color is the sky?",
        );
        let (context, question) = split_prompt(&prompt);
        assert_eq!(context, "The sky is blue.\n\nGrass is green.");
        assert_eq!(question, "What color is the sky?");
    }
}
