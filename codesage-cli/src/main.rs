use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codesage::{
    GeneratorConfig, PdfTextExtractor, QuestionGenerator, TextExtractor, DEFAULT_API_URL,
    DEFAULT_MODEL, DEFAULT_TIMEOUT,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "codesage",
    about = "Generate exam questions from PDF documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF file
    ExtractText {
        /// Input PDF file
        input: PathBuf,

        /// Output text file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate questions and answers from a PDF file
    Generate {
        /// Input PDF file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        llm: LlmArgs,
    },
}

#[derive(Args)]
struct LlmArgs {
    /// LLM provider API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Chat-completions endpoint
    #[arg(long, env = "CODESAGE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Model identifier sent to the provider
    #[arg(short, long, env = "CODESAGE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Deadline for the LLM call, in seconds
    #[arg(long, env = "CODESAGE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

impl LlmArgs {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.api_key.clone())
            .with_api_url(self.api_url.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays clean for piping
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ExtractText { input, output } => {
            let text = extract(&input)?;
            emit(&text, output.as_deref(), "Text extracted to")?;
        }

        Commands::Generate { input, output, llm } => {
            let text = extract(&input)?;

            info!("Requesting questions from {} at {}", llm.model, llm.api_url);
            let generator = QuestionGenerator::new(llm.generator_config())
                .context("Failed to build LLM client")?;
            let questions = generator
                .generate(&text)
                .await
                .context("Failed to generate questions")?;

            emit(&questions, output.as_deref(), "Questions written to")?;
        }
    }

    Ok(())
}

fn extract(input: &Path) -> Result<String> {
    let text = PdfTextExtractor::new()
        .extract_text(input)
        .with_context(|| format!("Failed to open PDF {}", input.display()))?;
    debug!("Extracted {} chars from {}", text.chars().count(), input.display());
    Ok(text)
}

fn emit(content: &str, output: Option<&Path>, label: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            println!("✓ {}: {}", label, path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
