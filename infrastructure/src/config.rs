use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub embed_batch_size: usize,
    pub request_timeout: Duration,
    pub max_file_bytes: u64,
    pub key_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 256,
            chunk_size: 1000,
            chunk_overlap: 0,
            top_k: 4,
            embed_batch_size: 64,
            request_timeout: Duration::from_secs(60),
            max_file_bytes: 10 * 1024 * 1024,
            key_prefix: domain::credential::DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Export `.env` (if any) into the process environment. Variables that are
/// already set are left alone.
pub fn load_dotenv() {
    dotenv().ok();
}

impl Config {
    pub fn load() -> Self {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            base_url: text("OPENAI_BASE_URL", defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            embedding_model: text("OPENAI_EMBEDDING_MODEL", defaults.embedding_model),
            completion_model: text("OPENAI_COMPLETION_MODEL", defaults.completion_model),
            temperature: parse_or(&lookup, "OPENAI_TEMPERATURE", defaults.temperature),
            max_tokens: parse_or(&lookup, "OPENAI_MAX_TOKENS", defaults.max_tokens),
            chunk_size: parse_or(&lookup, "ASKDOC_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: parse_or(&lookup, "ASKDOC_CHUNK_OVERLAP", defaults.chunk_overlap),
            top_k: parse_or(&lookup, "ASKDOC_TOP_K", defaults.top_k),
            embed_batch_size: parse_or(&lookup, "ASKDOC_EMBED_BATCH", defaults.embed_batch_size),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "ASKDOC_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            max_file_bytes: parse_or(&lookup, "ASKDOC_MAX_FILE_BYTES", defaults.max_file_bytes),
            key_prefix: text("ASKDOC_KEY_PREFIX", defaults.key_prefix),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring unparsable setting, using default");
                default
            }
        },
        None => default,
    }
}
