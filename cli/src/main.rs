//! `recomatch` entry point.
//!
//! Thin invocation surface over the ranking pipeline. Two modes:
//! - `emails`: list the contact email of every rankable profile
//! - `rank`: run a full ranking and print the top matches as JSON
//!
//! Logs go to stderr; stdout carries only the command's output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recomatch_embeddings::{EmbeddingProvider, HashProvider, OpenAIProvider};
use recomatch_ranking::{
    DEFAULT_TOP_K, EmbeddingConfig, EmbeddingProviderType, RankingConfig, RankingEngine,
    TaskQuery, format_matches, to_json,
};
use recomatch_store::{CandidateSource, SqliteCandidateSource};

#[derive(Parser)]
#[command(name = "recomatch")]
#[command(about = "Rank candidate profiles against a task description by semantic similarity")]
#[command(version)]
struct Cli {
    /// Path to the profiles database.
    #[arg(long, default_value = "database.sqlite", env = "RECOMATCH_DB")]
    database: PathBuf,

    /// Role excluded from the candidate pool.
    #[arg(long, default_value = "Admin")]
    exclude_role: String,

    /// Embedding provider.
    #[arg(long, value_enum, default_value = "openai")]
    provider: ProviderArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    /// OpenAI embeddings API (requires OPENAI_API_KEY).
    Openai,
    /// Deterministic offline token hasher.
    Hash,
}

impl From<ProviderArg> for EmbeddingProviderType {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => EmbeddingProviderType::OpenAI,
            ProviderArg::Hash => EmbeddingProviderType::Hash,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the contact email of every rankable profile.
    Emails,

    /// Rank profiles against a task and print the top matches as JSON.
    Rank {
        /// Normalized required skills.
        required_skills: String,

        /// Normalized required expertise.
        required_expertise: String,

        /// Normalized task description.
        description: String,

        /// Number of matches to return.
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

fn build_provider(arg: ProviderArg) -> Arc<dyn EmbeddingProvider> {
    match arg {
        ProviderArg::Openai => Arc::new(OpenAIProvider::new()),
        ProviderArg::Hash => Arc::new(HashProvider::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recomatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let source = SqliteCandidateSource::open(&cli.database)
        .with_context(|| format!("failed to open database {}", cli.database.display()))?;

    match cli.command {
        Commands::Emails => {
            let emails = source
                .fetch_emails(&cli.exclude_role)
                .context("failed to fetch candidate emails")?;

            for email in emails {
                println!("{email}");
            }
        }
        Commands::Rank {
            required_skills,
            required_expertise,
            description,
            top_k,
        } => {
            let candidates = source
                .fetch_candidates(&cli.exclude_role)
                .context("failed to fetch candidates")?;
            tracing::info!(
                "Loaded {} candidates from {}",
                candidates.len(),
                cli.database.display()
            );

            let provider = build_provider(cli.provider);
            if !provider.is_available() {
                anyhow::bail!(
                    "embedding provider {} is not configured (is OPENAI_API_KEY set?)",
                    provider.name()
                );
            }

            let config = RankingConfig::default().with_embedding(EmbeddingConfig {
                provider: cli.provider.into(),
                model: None,
            });

            let engine = RankingEngine::new(provider, config);
            let query = TaskQuery::new(required_skills, required_expertise, description);

            let ranked = engine.rank(&query, &candidates, top_k).await?;
            let report = format_matches(&ranked);

            println!("{}", to_json(&report)?);
        }
    }

    Ok(())
}
