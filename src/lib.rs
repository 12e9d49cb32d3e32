pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{graphql::GraphqlProxyClient, sheets::SheetFetcher};
pub use config::ImportConfig;
pub use core::{
    player::PlayerDataTransformer,
    probe::ConnectionProber,
    scrim_parser::{ScrimLayout, ScrimTabParser},
};
pub use domain::model::{
    Kda, MatchRecord, MatchType, PlayerPerformance, PlayerPerformanceResult, ProbeResult,
};
pub use utils::error::{ImportError, Result};
