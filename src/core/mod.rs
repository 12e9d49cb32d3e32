pub mod player;
pub mod probe;
pub mod scrim_parser;

pub use crate::domain::model::{
    Kda, MatchRecord, MatchType, PlayerPerformance, PlayerPerformanceResult, ProbeResult,
};
pub use crate::domain::ports::{GraphqlTransport, SheetSource};
pub use crate::utils::error::Result;
