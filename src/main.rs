use clap::Parser;
use scrim_import::config::cli::{matches_to_csv, to_json, LocalOutput, OutputFormat};
use scrim_import::config::Command;
use scrim_import::utils::error::ErrorCategory;
use scrim_import::utils::logger;
use scrim_import::{CliConfig, ConnectionProber, PlayerDataTransformer, Result};

async fn run(cli: &CliConfig) -> Result<bool> {
    let config = cli.import_config()?;

    match &cli.command {
        Command::Scrims { format, output, .. } => {
            let workbook_id = config.workbook_id()?;
            let parser = config.scrim_parser();

            tracing::info!("Importing scrim tabs from workbook {}", workbook_id);
            let records = parser.parse_scrim_tabs(workbook_id).await?;

            let content = match format {
                OutputFormat::Json => to_json(&records)?,
                OutputFormat::Csv => matches_to_csv(&records)?,
            };
            LocalOutput::new(output.clone()).write(&content)?;
            tracing::info!("✅ Imported {} scrim games", records.len());
            Ok(true)
        }
        Command::Player {
            player_id, output, ..
        } => {
            let transformer = PlayerDataTransformer::new(config.graphql_client()?);
            let result = transformer.fetch_player_performance(player_id).await;
            if result.is_fallback() {
                tracing::warn!("⚠️ Live stats unavailable, showing placeholder data");
            }

            LocalOutput::new(output.clone()).write(&to_json(&result)?)?;
            Ok(true)
        }
        Command::Probe { .. } => {
            let prober = ConnectionProber::new(config.graphql_client()?);
            let result = prober.probe().await;

            let marker = if result.accepted { "✅" } else { "❌" };
            println!("{} {}", marker, result.message);
            Ok(result.accepted)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    match run(&cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("❌ Import failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Remote => 2,
                ErrorCategory::Parse => 3,
                ErrorCategory::Output => 4,
            };
            if e.is_retryable() {
                eprintln!("💡 The remote service may be temporarily unavailable; retry later.");
            }
            std::process::exit(exit_code);
        }
    }
}
