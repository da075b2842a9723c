use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use codeling::{
    coding_toolkit, system_prompt, Agent, AppConfig, OllamaClient, Repl, ReplSink, Result,
};

const CONFIG_FILE: &str = "codeling.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the REPL.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = if Path::new(CONFIG_FILE).exists() {
        AppConfig::from_env_or_file(CONFIG_FILE)?
    } else {
        AppConfig::from_env()
    };

    let model = Arc::new(OllamaClient::from_config(&config.model)?);
    let tools = coding_toolkit(&config.tools, Some(Arc::new(ReplSink)));

    let cwd = std::env::current_dir()?;
    let agent = Agent::new(model, tools.clone(), system_prompt(&cwd, &tools));

    Repl::new(agent, config.model.model.clone()).run().await
}
