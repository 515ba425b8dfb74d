// Stackwright - multi-agent full-stack code generation
// Main entry point

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use stackwright::cli::{run_once, Cli, Command};
use stackwright::config::load_config;
use stackwright::gateway::LlmGateway;
use stackwright::logging::init_tracing;
use stackwright::pipeline::RunCoordinator;
use stackwright::server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_config(cli.config.as_deref())?;

    init_tracing(cli.verbose || config.logging.debug);

    let gateway = LlmGateway::from_config(&config)?;
    tracing::info!(
        provider = gateway.provider_name(),
        model = gateway.model_name(),
        "Provider ready"
    );
    let coordinator = RunCoordinator::from_config(&config, gateway)?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            server::serve(&config.server, coordinator).await?;
        }
        Command::Run {
            description,
            file,
            out,
        } => {
            let result =
                run_once(&coordinator, &description, file.as_deref(), out.as_deref()).await?;
            let body = json!({ "status": "success", "result": result });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
