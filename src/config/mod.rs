#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::ImportConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "scrim-import")]
#[command(about = "Imports scrim results and player stats into normalized records")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read the games of every `SCRIM DD/MM` tab in a workbook
    Scrims {
        #[arg(long)]
        workbook_id: Option<String>,

        #[arg(long)]
        sheets_api_key: Option<String>,

        #[arg(long, help = "Year assumed for DD/MM tab dates")]
        season_year: Option<i32>,

        #[arg(long, value_enum, default_value_t = cli::OutputFormat::Json)]
        format: cli::OutputFormat,

        #[arg(long, help = "Write to a .json or .csv file instead of stdout")]
        output: Option<String>,
    },
    /// Fetch a player's recent match stats through the relay
    Player {
        player_id: String,

        #[command(flatten)]
        relay: RelayArgs,

        #[arg(long)]
        output: Option<String>,
    },
    /// Check that the relay accepts the statistics API key
    Probe {
        #[command(flatten)]
        relay: RelayArgs,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct RelayArgs {
    #[arg(long)]
    pub relay_url: Option<String>,

    #[arg(long)]
    pub relay_token: Option<String>,

    #[arg(long)]
    pub stats_api_key: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Config file (if any) with command-line flags layered on top.
    pub fn import_config(&self) -> Result<ImportConfig> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::from_file(path)?,
            None => ImportConfig::default(),
        };

        match &self.command {
            Command::Scrims {
                workbook_id,
                sheets_api_key,
                season_year,
                output,
                ..
            } => {
                if let Some(id) = workbook_id {
                    config.sheets.workbook_id = Some(id.clone());
                }
                if let Some(key) = sheets_api_key {
                    config.sheets.api_key = Some(key.clone());
                }
                if let Some(year) = season_year {
                    config.layout.season_year = *year;
                }
                if let Some(path) = output {
                    validate_path("output", path)?;
                    validate_file_extension("output", path, &["json", "csv"])?;
                }
            }
            Command::Player { relay, output, .. } => {
                relay.apply(&mut config);
                if let Some(path) = output {
                    validate_path("output", path)?;
                    validate_file_extension("output", path, &["json"])?;
                }
            }
            Command::Probe { relay } => relay.apply(&mut config),
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl RelayArgs {
    fn apply(&self, config: &mut ImportConfig) {
        if let Some(url) = &self.relay_url {
            config.relay.url = Some(url.clone());
        }
        if let Some(token) = &self.relay_token {
            config.relay.token = Some(token.clone());
        }
        if let Some(key) = &self.stats_api_key {
            config.stats.api_key = Some(key.clone());
        }
    }
}
