//! CLI command definitions for adforge.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use crate::agents::{CodeArtifact, CoderAgent, CoderConfig, LibraryFamily, ScriptRequest};
use crate::llm::{ChatClient, ClientConfig};

/// Anomaly-detection script generation and repair agent.
#[derive(Parser)]
#[command(name = "adforge")]
#[command(about = "Generate and repair anomaly-detection analysis scripts with an LLM")]
#[command(version)]
#[command(
    long_about = "adforge is the coder agent of an anomaly-detection pipeline.\n\nIt turns an algorithm name, a documentation excerpt and dataset paths into an executable\nPyOD/PyGOD analysis script, and repairs a failing script from its runtime error message.\n\nExample usage:\n  adforge generate --algorithm KNN --family pyod \\\n      --train-path ./data/a_train.csv --test-path ./data/a_test.csv \\\n      --doc-file ./docs/knn.txt --params '{\"n_neighbors\": 5}' --output knn.py"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate an analysis script for an algorithm.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Repair a failed script artifact from its runtime error.
    #[command(alias = "rev")]
    Revise(ReviseArgs),
}

/// Connection flags shared by both subcommands.
#[derive(Parser, Debug)]
pub struct ModelArgs {
    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = "ADFORGE_API_BASE")]
    pub api_base: String,

    /// API key for bearer authentication.
    #[arg(long, env = "ADFORGE_API_KEY")]
    pub api_key: Option<String>,

    /// Chat model to use.
    #[arg(short = 'm', long, env = "ADFORGE_MODEL", default_value = crate::llm::DEFAULT_MODEL)]
    pub model: String,
}

impl ModelArgs {
    fn agent(&self) -> CoderAgent {
        let client = ChatClient::new(
            ClientConfig::new(&self.api_base, self.api_key.clone())
                .with_default_model(&self.model),
        );

        CoderAgent::new(
            Arc::new(client),
            CoderConfig::new().with_model(&self.model),
        )
    }
}

/// Arguments for `adforge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Algorithm class name (e.g. KNN, LOF, DOMINANT).
    #[arg(short, long)]
    pub algorithm: String,

    /// Library family: pyod (tabular) or pygod (graph).
    #[arg(short, long)]
    pub family: String,

    /// Training dataset path, injected verbatim into the script.
    #[arg(long)]
    pub train_path: String,

    /// Test dataset path, injected verbatim into the script.
    #[arg(long)]
    pub test_path: String,

    /// File containing the official documentation excerpt for the algorithm.
    #[arg(short, long)]
    pub doc_file: PathBuf,

    /// Hyperparameters as a JSON object (e.g. '{"n_neighbors": 5}').
    #[arg(short, long)]
    pub params: Option<String>,

    /// Write the generated script here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a fresh artifact JSON next to the script.
    #[arg(long)]
    pub artifact: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for `adforge revise`.
#[derive(Parser, Debug)]
pub struct ReviseArgs {
    /// Artifact JSON file ({code, algorithm, error_message, review_count}).
    /// Rewritten in place with the replacement code and incremented counter.
    #[arg(short, long)]
    pub artifact: PathBuf,

    /// File containing the official documentation excerpt for the algorithm.
    #[arg(short, long)]
    pub doc_file: PathBuf,

    /// Refuse to revise once review_count has reached this value.
    #[arg(long, default_value = "3")]
    pub max_reviews: u32,

    /// Also write the replacement script here.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the CLI with parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Revise(args) => run_revise(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let family: LibraryFamily = args.family.parse()?;

    let documentation = fs::read_to_string(&args.doc_file)
        .with_context(|| format!("Failed to read doc file {}", args.doc_file.display()))?;

    let parameters = match &args.params {
        Some(raw) => serde_json::from_str::<serde_json::Map<_, _>>(raw)
            .context("Failed to parse --params as a JSON object")?,
        None => serde_json::Map::new(),
    };

    let request = ScriptRequest::new(
        &args.algorithm,
        family,
        &args.train_path,
        &args.test_path,
        documentation,
    )
    .with_parameters(parameters);

    info!(algorithm = %args.algorithm, family = %family, "Generating analysis script");

    let agent = args.model.agent();
    let source = agent.generate_script(&request).await?;

    if let Some(path) = &args.artifact {
        let mut artifact = CodeArtifact::new(&args.algorithm);
        artifact.code = source.clone();
        write_artifact(path, &artifact)?;
        info!(path = %path.display(), "Wrote artifact");
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &source)
                .with_context(|| format!("Failed to write script to {}", path.display()))?;
            info!(path = %path.display(), "Wrote generated script");
        }
        None => println!("{}", source),
    }

    Ok(())
}

async fn run_revise(args: ReviseArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.artifact)
        .with_context(|| format!("Failed to read artifact {}", args.artifact.display()))?;
    let mut artifact: CodeArtifact =
        serde_json::from_str(&raw).context("Failed to parse artifact JSON")?;

    if artifact.review_count >= args.max_reviews {
        bail!(
            "Artifact '{}' already revised {} times (max {})",
            artifact.algorithm,
            artifact.review_count,
            args.max_reviews
        );
    }

    let documentation = fs::read_to_string(&args.doc_file)
        .with_context(|| format!("Failed to read doc file {}", args.doc_file.display()))?;

    info!(
        algorithm = %artifact.algorithm,
        review_count = artifact.review_count,
        "Revising failed script"
    );

    let agent = args.model.agent();
    let source = agent.revise_script(&mut artifact, &documentation).await?;

    // The CLI is the orchestrating caller: write-back is its job.
    artifact.code = source.clone();
    write_artifact(&args.artifact, &artifact)?;
    info!(
        path = %args.artifact.display(),
        review_count = artifact.review_count,
        "Updated artifact"
    );

    if let Some(path) = &args.output {
        fs::write(path, &source)
            .with_context(|| format!("Failed to write script to {}", path.display()))?;
    } else {
        println!("{}", source);
    }

    Ok(())
}

fn write_artifact(path: &std::path::Path, artifact: &CodeArtifact) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(artifact)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write artifact to {}", path.display()))?;
    Ok(())
}
