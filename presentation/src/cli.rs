use application::rag_service::RemoteRagService;
use clap::Parser;
use colored::Colorize;
use domain::error::{ChunkingError, IndexError, InputError, ProviderError};
use domain::models::Answer;
use domain::submission::Submission;
use infrastructure::config::{load_dotenv, Config};
use infrastructure::document_loader::DocumentLoader;
use shared::prompts::{ask_api_key, ask_question};
use shared::types::Result;
use shared::utils::preview;
use std::ffi::OsString;
use std::path::PathBuf;

pub const QUESTION_PLACEHOLDER: &str = "Please provide a short summary.";

const ABOUT: &str = "\
Ask the Document: upload a plaintext document, ask a question about it and get an answer \
grounded in its content.

How it works:
  - Upload a document: any .txt file.
  - Ask a question related to the document's content.
  - Get an answer: the most relevant passages are retrieved and an OpenAI model answers \
from them.";

const KEY_HELP: &str = "\
Get an OpenAI API key:
  1. Go to https://platform.openai.com/account/api-keys
  2. Click on the `+ Create new secret key` button.
  3. Enter an identifier name (optional) and click on the `Create secret key` button.";

#[derive(Parser)]
#[command(name = "askdoc", version)]
#[command(about = "Ask questions about a plaintext document", long_about = ABOUT, after_help = KEY_HELP)]
pub struct Cli {
    /// Plaintext (.txt) document to ask about
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Question about the document (prompted for when omitted)
    #[arg(short, long)]
    pub question: Option<String>,

    /// OpenAI API key (prompted for when omitted)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum segment length in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared by consecutive segments
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Number of segments passed to the model
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Completion model name
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Print the retrieved segments under the answer
    #[arg(long)]
    pub show_sources: bool,

    /// Copy the answer to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Never prompt; missing inputs become errors
    #[arg(long)]
    pub no_input: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// `.env` has to be exported before clap reads the `OPENAI_API_KEY` fallback.
    pub fn parse_with_dotenv<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        load_dotenv();
        Self::parse_from(args)
    }

    /// Flags take precedence over the environment.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        if let Some(model) = &self.model {
            config.completion_model = model.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
    }
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Config::load();
        cli.apply_overrides(&mut config);
        Self::new(config)
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        let service = RemoteRagService::from_config(&self.config)?;
        let submission = self.collect_submission(&cli)?;

        eprintln!("{}", "Calculating...".dimmed());
        let answer = service.answer(&submission).await?;
        // The key is not needed past this point.
        drop(submission);

        self.render(&answer, cli.show_sources);
        if cli.copy {
            copy_to_clipboard(&answer.text);
        }
        Ok(())
    }

    fn collect_submission(&self, cli: &Cli) -> Result<Submission> {
        let path = cli.file.as_deref().ok_or(InputError::MissingDocument)?;
        let document = DocumentLoader::new(self.config.max_file_bytes).load(path)?;

        let question = match &cli.question {
            Some(question) => question.clone(),
            None if cli.no_input => return Err(InputError::MissingQuestion.into()),
            None => ask_question(QUESTION_PLACEHOLDER)?,
        };

        let api_key = match &cli.api_key {
            Some(key) => key.clone(),
            None if cli.no_input => String::new(),
            None => ask_api_key()?,
        };

        Ok(Submission::new(Some(document), question, api_key))
    }

    fn render(&self, answer: &Answer, show_sources: bool) {
        println!("{}", answer.text.trim().cyan());
        if !show_sources {
            return;
        }
        if !answer.has_sources() {
            println!("{}", "No sources: the document is empty.".yellow());
            return;
        }
        println!("\n{}", "Sources:".green());
        for source in &answer.sources {
            println!(
                "  {} {}",
                format!(
                    "[#{} @{} score {:.3}]",
                    source.segment.ordinal, source.segment.start_offset, source.score
                )
                .blue(),
                preview(&source.segment.text, 160).replace('\n', " ")
            );
        }
    }
}

fn copy_to_clipboard(text: &str) {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()));
    match result {
        Ok(()) => eprintln!("{}", "Answer copied to clipboard.".green()),
        Err(e) => tracing::warn!(error = %e, "could not copy answer to clipboard"),
    }
}

pub fn describe_error(err: &anyhow::Error) -> String {
    if let Some(input) = err.downcast_ref::<InputError>() {
        return format!("Invalid input: {input}");
    }
    if let Some(provider) = err.downcast_ref::<ProviderError>() {
        return match provider {
            ProviderError::Authentication(_) => {
                format!("The provider rejected the API key ({provider})")
            }
            ProviderError::RateLimited(_) => {
                format!("The provider is rate limiting this key or it is out of quota ({provider})")
            }
            _ => format!("The provider request failed: {provider}"),
        };
    }
    if let Some(chunking) = err.downcast_ref::<ChunkingError>() {
        return format!("Invalid configuration: {chunking}");
    }
    if let Some(index) = err.downcast_ref::<IndexError>() {
        return format!("Retrieval failed: {index}");
    }
    format!("Error: {err:#}")
}
