//! Command-line prompt enhancer.
//!
//! Reads guides from a directory of `<platform>.json` files and the API key
//! from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Enhance a prompt for Claude
//! promptsmith --platform claude --prompt "write a poem about the sea"
//!
//! # Pipe the prompt in
//! echo "summarize this csv" | promptsmith --platform gpt --stdin
//!
//! # Show the instruction that would be sent, without calling the API
//! promptsmith --platform claude --prompt "explain recursion" --dry-run
//!
//! # Print the guide file JSON Schema
//! promptsmith --schema
//! ```

use std::io::Read;
use std::sync::Arc;

use clap::Parser;
use promptsmith::gateway::openrouter::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use promptsmith::prelude::*;
use tracing_subscriber::EnvFilter;

/// Rewrite a prompt using a platform's prompting guide.
#[derive(Parser)]
#[command(name = "promptsmith")]
struct Cli {
    /// Target platform; selects `<guides>/<platform>.json`.
    #[arg(long, required_unless_present = "schema")]
    platform: Option<String>,

    /// Prompt to enhance.
    #[arg(long, conflicts_with = "stdin")]
    prompt: Option<String>,

    /// Read the prompt from standard input.
    #[arg(long)]
    stdin: bool,

    /// Directory holding the guide files.
    #[arg(long, default_value = "guides", env = "PROMPTSMITH_GUIDES")]
    guides: String,

    /// Model to use for completions.
    #[arg(long, default_value = DEFAULT_MODEL, env = "PROMPTSMITH_MODEL")]
    model: String,

    /// Maximum tokens in the enhanced prompt.
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature.
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Retries for transient API failures.
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Print the instruction instead of calling the API.
    #[arg(long)]
    dry_run: bool,

    /// Print the JSON Schema of a guide file and exit.
    #[arg(long)]
    schema: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.schema {
        let schema = guide_schema().map_err(|e| e.to_string())?;
        println!("{schema}");
        return Ok(());
    }

    let prompt = match (&cli.prompt, cli.stdin) {
        (Some(p), _) => p.clone(),
        (None, true) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
        (None, false) => return Err("one of --prompt or --stdin is required".into()),
    };
    let request = EnhanceRequest::new(prompt, cli.platform.unwrap_or_default());
    let guides = Arc::new(DirectoryGuides::new(&cli.guides));

    if cli.dry_run {
        let enhancer = Enhancer::new(guides, Arc::new(Unconfigured));
        let preview = enhancer.preview(&request).await.map_err(|e| e.to_string())?;
        eprintln!(
            "task: {} | principles: {}",
            preview.task,
            preview.principles.join(", ")
        );
        println!("{}", preview.instruction);
        return Ok(());
    }

    let api_key = std::env::var("OPENROUTER_KEY")
        .map_err(|_| "Set OPENROUTER_KEY env var to your OpenRouter API key")?;
    let config = GatewayConfig::new(cli.model)
        .with_max_tokens(cli.max_tokens)
        .with_temperature(cli.temperature)
        .with_retries(cli.retries);
    let client = OpenRouterClient::new(api_key)
        .map_err(|e| format!("failed to create API client: {e}"))?
        .with_config(config);

    let enhancer = Enhancer::new(guides, Arc::new(client));
    let result = enhancer.enhance(&request).await.map_err(|e| e.to_string())?;

    println!("{}", result.enhanced_prompt);
    Ok(())
}

/// Gateway for `--dry-run`, where no completion is ever requested.
struct Unconfigured;

impl CompletionGateway for Unconfigured {
    fn complete<'a>(&'a self, _system: &'a str, _user: &'a str) -> CompletionFuture<'a> {
        Box::pin(async { Err(CompletionError::Request("no completion backend configured".into())) })
    }
}
