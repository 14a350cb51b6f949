//! Prompt enhancement relay server.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p promptsmith-web
//! OPENROUTER_KEY=sk-... cargo run -p promptsmith-web -- --guides ./guides --port 8080
//! OPENROUTER_KEY=sk-... cargo run -p promptsmith-web -- --model google/gemini-2.5-flash --retries 2
//! ```
//!
//! Then:
//!
//! ```bash
//! curl -s localhost:3001/api/enhance \
//!   -H 'content-type: application/json' \
//!   -d '{"prompt": "write a poem about rust", "platform": "claude"}'
//! ```

use std::net::IpAddr;
use std::sync::Arc;

use clap::Parser;
use promptsmith::gateway::openrouter::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use promptsmith::prelude::*;
use promptsmith_web::{WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prompt enhancement relay.
#[derive(Parser)]
#[command(about = "HTTP relay that enhances prompts using per-platform guides")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1", env = "PROMPTSMITH_HOST")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 3001, env = "PROMPTSMITH_PORT")]
    port: u16,

    /// Directory holding `<platform>.json` guide files.
    #[arg(long, default_value = "guides", env = "PROMPTSMITH_GUIDES")]
    guides: String,

    /// LLM model to use.
    #[arg(long, default_value = DEFAULT_MODEL, env = "PROMPTSMITH_MODEL")]
    model: String,

    /// Maximum tokens in an enhanced prompt.
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature.
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Retries for transient API failures.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 1. Create the OpenRouter client.
    let api_key = std::env::var("OPENROUTER_KEY")
        .map_err(|_| "Set OPENROUTER_KEY env var to your OpenRouter API key")?;
    let config = GatewayConfig::new(&args.model)
        .with_max_tokens(args.max_tokens)
        .with_temperature(args.temperature)
        .with_retries(args.retries);
    let client = OpenRouterClient::new(api_key)
        .map_err(|e| e.to_string())?
        .with_config(config);

    // 2. Guides are re-read on every request, so edits apply without a restart.
    let guides = DirectoryGuides::new(&args.guides);
    info!("Serving guides from {}", guides.dir().display());

    // 3. Spawn the server.
    let enhancer = Enhancer::new(Arc::new(guides), Arc::new(client));
    let web_config = WebConfig {
        bind_addr: (args.host, args.port).into(),
        ..Default::default()
    };
    let addr = spawn_web(enhancer, web_config)
        .await
        .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
    println!("promptsmith-web: http://{addr}");

    tokio::signal::ctrl_c().await.map_err(|e| e.to_string())?;
    info!("Shutting down");
    Ok(())
}
