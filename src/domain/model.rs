use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Scrim,
    Championship,
}

/// One scrimmage game read from a workbook tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// `<tabName>_<rowIndex>`
    pub id: String,
    pub date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub winner: String,
    pub blue_side: Vec<String>,
    pub red_side: Vec<String>,
    pub duration_seconds: u32,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kda {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

/// One participant's stat line for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPerformance {
    pub player_id: String,
    pub champion_id: String,
    pub kda: Kda,
    pub cs: u32,
    pub gold: u32,
    pub damage: u32,
    pub game_time_seconds: u32,
}

/// Outcome of a player stats import, tagged with the path that produced the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum PlayerPerformanceResult {
    Live {
        rows: Vec<PlayerPerformance>,
    },
    Fallback {
        rows: Vec<PlayerPerformance>,
        reason: String,
    },
}

impl PlayerPerformanceResult {
    pub fn rows(&self) -> &[PlayerPerformance] {
        match self {
            PlayerPerformanceResult::Live { rows } => rows,
            PlayerPerformanceResult::Fallback { rows, .. } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<PlayerPerformance> {
        match self {
            PlayerPerformanceResult::Live { rows } => rows,
            PlayerPerformanceResult::Fallback { rows, .. } => rows,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PlayerPerformanceResult::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub accepted: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_record_serializes_with_iso_date() {
        let record = MatchRecord {
            id: "SCRIM 15/01_1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            team1: "Alpha".to_string(),
            team2: "Beta".to_string(),
            winner: "Alpha".to_string(),
            blue_side: vec!["Alpha".to_string()],
            red_side: vec![],
            duration_seconds: 1500,
            match_type: MatchType::Scrim,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["matchType"], "scrim");
        assert_eq!(json["blueSide"][0], "Alpha");
    }

    #[test]
    fn test_result_tag_is_observable() {
        let result = PlayerPerformanceResult::Fallback {
            rows: vec![],
            reason: "relay unavailable".to_string(),
        };
        assert!(result.is_fallback());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["reason"], "relay unavailable");
    }
}
