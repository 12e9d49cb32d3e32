use crate::domain::model::{MatchRecord, MatchType};
use crate::utils::error::{ImportError, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Writes command output to a file, or to stdout when no path is given.
#[derive(Debug, Clone)]
pub struct LocalOutput {
    path: Option<String>,
}

impl LocalOutput {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }

    pub fn write(&self, content: &str) -> Result<()> {
        match &self.path {
            Some(path) => {
                let full_path = Path::new(path);
                if let Some(parent) = full_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(full_path, content)?;
                tracing::debug!("Wrote {} bytes to {}", content.len(), path);
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", content)?;
            }
        }
        Ok(())
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One line per game; side rosters are joined with `;`.
pub fn matches_to_csv(records: &[MatchRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "date",
        "team1",
        "team2",
        "winner",
        "blue_side",
        "red_side",
        "duration_seconds",
        "match_type",
    ])?;

    for record in records {
        let match_type = match record.match_type {
            MatchType::Scrim => "scrim",
            MatchType::Championship => "championship",
        };
        writer.write_record([
            record.id.as_str(),
            record.date.to_string().as_str(),
            record.team1.as_str(),
            record.team2.as_str(),
            record.winner.as_str(),
            record.blue_side.join(";").as_str(),
            record.red_side.join(";").as_str(),
            record.duration_seconds.to_string().as_str(),
            match_type,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
