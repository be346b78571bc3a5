//! Downtime predictor - main entry point
//!
//! Runs the HTTP server by default; `train`, `predict` and `info` work
//! offline against the same model file.

use clap::Parser;
use downtime_predictor::cli::{cmd_info, cmd_predict, cmd_serve, cmd_train, Cli, Commands};
use downtime_predictor::inference::PredictionInput;
use downtime_predictor::server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "downtime_predictor=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host, model_path }) => {
            cmd_serve(&host, port, model_path).await?;
        }
        Some(Commands::Train { data, output }) => {
            cmd_train(&data, &output)?;
        }
        Some(Commands::Predict { model, min_temp, max_temp, leakage, electricity }) => {
            let input = PredictionInput { min_temp, max_temp, leakage, electricity };
            cmd_predict(&model, input)?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data)?;
        }
        None => {
            let config = ServerConfig::default();
            cmd_serve(&config.host, config.port, config.model_path).await?;
        }
    }

    Ok(())
}
