//! doc-insight command line
//!
//! Run with: cargo run -p doc-insight -- summarize report.md

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use doc_insight::{
    config::{AppConfig, GenerationProvider},
    ingestion::FileParser,
    retrieval::{KeywordSelector, WordChunker},
    types::ConversationTurn,
    DocumentAssistant, Error,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "doc-insight",
    version,
    about = "Summaries, Q&A, insights and compliance checks for text documents"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Generation provider (gemini or openai)
    #[arg(long, global = true)]
    provider: Option<GenerationProvider>,

    /// Model identifier
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a document
    Summarize { file: PathBuf },
    /// Ask a question about a document
    Ask {
        file: PathBuf,
        /// The question to answer
        #[arg(short, long)]
        question: String,
        /// JSON file with earlier turns: [{"role": "user", "content": "..."}]
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Extract dates, people, organizations, action items and key numbers
    Insights { file: PathBuf },
    /// Check a document for legal compliance
    Compliance { file: PathBuf },
    /// Show how a document is chunked and which chunk a query selects
    Chunks {
        file: PathBuf,
        /// Words per chunk (defaults to the configured chunk size)
        #[arg(long)]
        size: Option<usize>,
        /// Query to score chunks against
        #[arg(long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so results on stdout stay machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_insight=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        if let Some(Error::Generation(gen_err)) = err.downcast_ref::<Error>() {
            if gen_err.is_configuration() {
                tracing::error!("Check the provider, API key and model id in your configuration or .env file");
            }
        }
        return Err(err);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let parser = FileParser::new(config.intake.clone());

    match cli.command {
        Command::Summarize { file } => {
            let document = parser.load(&file).await?;
            let assistant = DocumentAssistant::from_config(config)?;
            print_json(&assistant.summarize(&document.content).await?)?;
        }
        Command::Ask {
            file,
            question,
            history,
        } => {
            let document = parser.load(&file).await?;
            let history = match history {
                Some(path) => load_history(&path)?,
                None => Vec::new(),
            };
            let assistant = DocumentAssistant::from_config(config)?;
            let answer = assistant
                .answer_question(&document.content, &question, &history)
                .await?;
            print_json(&answer)?;
        }
        Command::Insights { file } => {
            let document = parser.load(&file).await?;
            let assistant = DocumentAssistant::from_config(config)?;
            print_json(&assistant.extract_insights(&document.content).await?)?;
        }
        Command::Compliance { file } => {
            let document = parser.load(&file).await?;
            let assistant = DocumentAssistant::from_config(config)?;
            print_json(&assistant.check_compliance(&document.content).await?)?;
        }
        Command::Chunks { file, size, query } => {
            let document = parser.load(&file).await?;
            let size = size.unwrap_or(config.retrieval.chunk_size_tokens);
            show_chunks(&config, &document.content, size, query.as_deref())?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Some(provider) = cli.provider {
        if provider != config.generation.provider {
            // Provider-specific key and model from the environment follow the new provider
            config.generation.provider = provider;
            config.generation.api_key = None;
            config.generation.model_id = None;
            config.generation.base_url = None;
            config.apply_env_overrides(|key| match key {
                "DOC_INSIGHT_PROVIDER" => None,
                _ => std::env::var(key).ok(),
            });
            config.validate()?;
        }
    }
    if let Some(model) = &cli.model {
        config.generation.model_id = Some(model.clone());
    }

    Ok(config)
}

fn load_history(path: &Path) -> anyhow::Result<Vec<ConversationTurn>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid conversation history in {}", path.display()))
}

fn show_chunks(
    config: &AppConfig,
    text: &str,
    size: usize,
    query: Option<&str>,
) -> anyhow::Result<()> {
    let chunks = WordChunker::new(size)?.chunk(text);
    let selector = KeywordSelector::new(config.retrieval.min_query_token_chars);

    let terms = query.map(|q| selector.query_terms(q)).unwrap_or_default();
    let selected = match query {
        Some(q) => Some(selector.select(&chunks, q)?.index),
        None => None,
    };

    println!("{} chunks of up to {} words", chunks.len(), size);
    for chunk in &chunks {
        let marker = if selected == Some(chunk.index) { "  <- selected" } else { "" };
        if query.is_some() {
            println!(
                "  [{}] {} tokens, score {}{}",
                chunk.index,
                chunk.token_count,
                selector.score(chunk, &terms),
                marker
            );
        } else {
            println!("  [{}] {} tokens", chunk.index, chunk.token_count);
        }
    }
    if query.is_some() {
        println!("query terms: {}", terms.join(", "));
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
