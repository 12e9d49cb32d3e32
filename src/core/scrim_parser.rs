use crate::domain::model::{MatchRecord, MatchType};
use crate::domain::ports::SheetSource;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SCRIM_TAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SCRIM\s+(\d{2})/(\d{2})").expect("valid scrim tab pattern"));

static RANGE_COLUMNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)\d*:([A-Z]+)\d*$").expect("valid A1 range pattern"));

const DEFAULT_TEAM1: &str = "Blue Team";
const DEFAULT_TEAM2: &str = "Red Team";
const DEFAULT_WINNER: &str = "Blue";
const MAX_SIDE_SIZE: usize = 5;
/// The spreadsheet grid ends at column ZZZ.
const MAX_COLUMN_LETTERS: usize = 3;

/// Positional convention of a scrim tab. Indices are 0-based offsets into a
/// row of the fetched grid (index 5 is column F).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrimLayout {
    pub cells: String,
    pub anchor_column: usize,
    pub team1_column: usize,
    pub team2_column: usize,
    pub winner_column: usize,
    pub blue_side_start: usize,
    pub red_side_start: usize,
    pub side_size: usize,
    pub max_rows_per_tab: usize,
    /// Tab names only carry `DD/MM`.
    pub season_year: i32,
    pub default_duration_seconds: u32,
}

impl Default for ScrimLayout {
    fn default() -> Self {
        Self {
            cells: "A1:AF50".to_string(),
            anchor_column: 5,
            team1_column: 5,
            team2_column: 10,
            winner_column: 15,
            blue_side_start: 5,
            red_side_start: 10,
            side_size: MAX_SIDE_SIZE,
            max_rows_per_tab: 6,
            season_year: 2024,
            default_duration_seconds: 25 * 60,
        }
    }
}

/// 1-based number of a column label (`A` is 1, `AF` is 32).
fn column_number(label: &str) -> Option<usize> {
    if label.len() > MAX_COLUMN_LETTERS {
        return None;
    }
    label
        .bytes()
        .try_fold(0usize, |acc, b| acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize))
}

/// Number of columns covered by an A1 range such as `A1:AF50`. Row offsets in
/// the fetched grid start at the range's first column.
fn range_width(cells: &str) -> Option<usize> {
    let caps = RANGE_COLUMNS.captures(cells)?;
    let start = column_number(&caps[1])?;
    let end = column_number(&caps[2])?;
    end.checked_sub(start).map(|span| span + 1)
}

impl Validate for ScrimLayout {
    fn validate(&self) -> Result<()> {
        let width = range_width(&self.cells).ok_or_else(|| ImportError::InvalidConfigValueError {
            field: "layout.cells".to_string(),
            value: self.cells.clone(),
            reason: "Expected an A1 range such as A1:AF50, columns A..ZZZ in order".to_string(),
        })?;

        validate_range("layout.side_size", self.side_size, 1, MAX_SIDE_SIZE)?;
        let columns = [
            ("layout.anchor_column", self.anchor_column),
            ("layout.team1_column", self.team1_column),
            ("layout.team2_column", self.team2_column),
            ("layout.winner_column", self.winner_column),
            ("layout.blue_side_start", self.blue_side_start.saturating_add(self.side_size - 1)),
            ("layout.red_side_start", self.red_side_start.saturating_add(self.side_size - 1)),
        ];
        for (field, column) in columns {
            validate_range(field, column, 0, width - 1)?;
        }

        validate_range("layout.max_rows_per_tab", self.max_rows_per_tab, 1, 49)?;
        validate_range("layout.season_year", self.season_year, 2000, 2100)?;
        Ok(())
    }
}

/// Builds an A1 range scoped to one tab, e.g. `'SCRIM 15/01'!A1:AF50`.
pub fn a1_range(tab: &str, cells: &str) -> String {
    format!("'{}'!{}", tab.replace('\'', "''"), cells)
}

pub fn is_scrim_tab(tab: &str) -> bool {
    SCRIM_TAB.is_match(tab)
}

/// Date encoded in a tab name as `DD/MM`.
pub fn parse_tab_date(tab: &str, year: i32) -> Result<NaiveDate> {
    let caps = SCRIM_TAB.captures(tab).ok_or_else(|| ImportError::ParseError {
        message: format!("tab '{}' has no DD/MM token", tab),
    })?;
    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ImportError::ParseError {
        message: format!("tab '{}' does not name a calendar date", tab),
    })
}

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Discovers the scrim tabs of a workbook and reads their games.
pub struct ScrimTabParser<S: SheetSource> {
    source: S,
    layout: ScrimLayout,
}

impl<S: SheetSource> ScrimTabParser<S> {
    pub fn new(source: S) -> Self {
        Self::with_layout(source, ScrimLayout::default())
    }

    pub fn with_layout(source: S, layout: ScrimLayout) -> Self {
        Self { source, layout }
    }

    pub fn layout(&self) -> &ScrimLayout {
        &self.layout
    }

    /// Reads every matching tab in metadata order. Any fetch failure aborts
    /// the whole import; nothing from earlier tabs is returned.
    pub async fn parse_scrim_tabs(&self, workbook_id: &str) -> Result<Vec<MatchRecord>> {
        validate_non_empty_string("workbook_id", workbook_id)?;

        let tabs = self.source.list_tabs(workbook_id).await?;
        let scrim_tabs: Vec<String> = tabs.into_iter().filter(|tab| is_scrim_tab(tab)).collect();
        tracing::info!("Found {} scrim tabs in workbook", scrim_tabs.len());

        let mut matches = Vec::new();
        for tab in &scrim_tabs {
            let date = match parse_tab_date(tab, self.layout.season_year) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!("Skipping tab '{}': {}", tab, e);
                    continue;
                }
            };

            let range = a1_range(tab, &self.layout.cells);
            let grid = self.source.fetch_range(workbook_id, &range).await?;
            let before = matches.len();
            matches.extend(self.records_from_grid(tab, date, &grid));
            tracing::info!("Tab '{}': {} games", tab, matches.len() - before);
        }

        Ok(matches)
    }

    /// Row 0 is the header; rows without an anchor cell are not games.
    pub fn records_from_grid(
        &self,
        tab: &str,
        date: NaiveDate,
        grid: &[Vec<String>],
    ) -> Vec<MatchRecord> {
        let layout = &self.layout;

        grid.iter()
            .enumerate()
            .skip(1)
            .take(layout.max_rows_per_tab)
            .filter(|(_, row)| cell(row, layout.anchor_column).is_some())
            .map(|(row_index, row)| MatchRecord {
                id: format!("{}_{}", tab, row_index),
                date,
                team1: cell(row, layout.team1_column)
                    .unwrap_or(DEFAULT_TEAM1)
                    .to_string(),
                team2: cell(row, layout.team2_column)
                    .unwrap_or(DEFAULT_TEAM2)
                    .to_string(),
                winner: cell(row, layout.winner_column)
                    .unwrap_or(DEFAULT_WINNER)
                    .to_string(),
                blue_side: self.side(row, layout.blue_side_start),
                red_side: self.side(row, layout.red_side_start),
                duration_seconds: layout.default_duration_seconds,
                match_type: MatchType::Scrim,
            })
            .collect()
    }

    fn side(&self, row: &[String], start: usize) -> Vec<String> {
        (start..start + self.layout.side_size.min(MAX_SIDE_SIZE))
            .filter_map(|index| cell(row, index))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockWorkbook {
        tabs: Vec<String>,
        grids: HashMap<String, Vec<Vec<String>>>,
        failing_range: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    impl MockWorkbook {
        fn new(tabs: &[&str]) -> Self {
            Self {
                tabs: tabs.iter().map(|t| t.to_string()).collect(),
                grids: HashMap::new(),
                failing_range: None,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn with_grid(mut self, tab: &str, grid: Vec<Vec<String>>) -> Self {
            self.grids.insert(a1_range(tab, "A1:AF50"), grid);
            self
        }

        fn failing_on(mut self, tab: &str) -> Self {
            self.failing_range = Some(a1_range(tab, "A1:AF50"));
            self
        }
    }

    #[async_trait]
    impl SheetSource for MockWorkbook {
        async fn list_tabs(&self, _workbook_id: &str) -> Result<Vec<String>> {
            Ok(self.tabs.clone())
        }

        async fn fetch_range(&self, _workbook_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
            self.requested.lock().unwrap().push(range.to_string());
            if self.failing_range.as_deref() == Some(range) {
                return Err(ImportError::remote("Spreadsheet API error: Service Unavailable (503)"));
            }
            Ok(self.grids.get(range).cloned().unwrap_or_default())
        }
    }

    fn header() -> Vec<String> {
        (0..16).map(|i| format!("H{}", i)).collect()
    }

    /// Row with blue players in F..J, red players in K..O and the winner in P.
    fn game_row(blue: &[&str], red: &[&str], winner: &str) -> Vec<String> {
        let mut row = vec![String::new(); 16];
        row[0] = "Game".to_string();
        for (i, name) in blue.iter().enumerate() {
            row[5 + i] = name.to_string();
        }
        for (i, name) in red.iter().enumerate() {
            row[10 + i] = name.to_string();
        }
        row[15] = winner.to_string();
        row
    }

    fn full_game() -> Vec<String> {
        game_row(
            &["Top1", "Jg1", "Mid1", "Adc1", "Sup1"],
            &["Top2", "Jg2", "Mid2", "Adc2", "Sup2"],
            "Top1",
        )
    }

    #[test]
    fn test_scrim_tab_pattern_is_case_insensitive() {
        assert!(is_scrim_tab("SCRIM 15/01"));
        assert!(is_scrim_tab("scrim  03/02"));
        assert!(is_scrim_tab("Scrim\t22/01"));
        assert!(!is_scrim_tab("Notes"));
        assert!(!is_scrim_tab("SCRIM 1/01"));
        assert!(!is_scrim_tab("SCRIM15/01"));
        assert!(!is_scrim_tab("CHAMP 15/01"));
    }

    #[test]
    fn test_a1_range_quotes_tab_name() {
        assert_eq!(a1_range("SCRIM 15/01", "A1:AF50"), "'SCRIM 15/01'!A1:AF50");
        assert_eq!(a1_range("Coach's notes", "A1:B2"), "'Coach''s notes'!A1:B2");
    }

    #[test]
    fn test_parse_tab_date_uses_season_year() {
        assert_eq!(
            parse_tab_date("SCRIM 15/01", 2024).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_tab_date("SCRIM 15/01", 2025).unwrap().to_string(),
            "2025-01-15"
        );
    }

    #[test]
    fn test_parse_tab_date_rejects_impossible_dates() {
        assert!(matches!(
            parse_tab_date("SCRIM 31/02", 2024),
            Err(ImportError::ParseError { .. })
        ));
        assert!(parse_tab_date("Notes", 2024).is_err());
    }

    #[test]
    fn test_six_rows_produce_six_records() {
        let parser = ScrimTabParser::new(MockWorkbook::new(&[]));
        let mut grid = vec![header()];
        grid.extend((0..8).map(|_| full_game()));
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let records = parser.records_from_grid("SCRIM 15/01", date, &grid);

        assert_eq!(records.len(), 6);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "SCRIM 15/01_1",
                "SCRIM 15/01_2",
                "SCRIM 15/01_3",
                "SCRIM 15/01_4",
                "SCRIM 15/01_5",
                "SCRIM 15/01_6"
            ]
        );
        assert!(records.iter().all(|r| r.match_type == MatchType::Scrim));
        assert!(records.iter().all(|r| r.duration_seconds == 1500));
    }

    #[test]
    fn test_row_without_anchor_is_skipped() {
        let parser = ScrimTabParser::new(MockWorkbook::new(&[]));
        let mut orphan = game_row(&[], &["Top2", "Jg2"], "Top2");
        orphan[6] = "Jg1".to_string();
        let grid = vec![header(), orphan, full_game()];
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let records = parser.records_from_grid("SCRIM 15/01", date, &grid);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "SCRIM 15/01_2");
    }

    #[test]
    fn test_sides_drop_empty_cells() {
        let parser = ScrimTabParser::new(MockWorkbook::new(&[]));
        let mut row = game_row(&["Top1", "", "Mid1", "", "Sup1"], &["Top2"], "");
        row.truncate(11);
        let grid = vec![header(), row];
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let records = parser.records_from_grid("SCRIM 15/01", date, &grid);

        assert_eq!(records[0].blue_side, vec!["Top1", "Mid1", "Sup1"]);
        assert_eq!(records[0].red_side, vec!["Top2"]);
        assert_eq!(records[0].team1, "Top1");
        assert_eq!(records[0].team2, "Top2");
        assert_eq!(records[0].winner, "Blue");
    }

    #[test]
    fn test_missing_team_cells_use_placeholders() {
        let parser = ScrimTabParser::new(MockWorkbook::new(&[]));
        let grid = vec![header(), game_row(&["Top1"], &[], "")];
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let records = parser.records_from_grid("SCRIM 15/01", date, &grid);

        assert_eq!(records[0].team2, "Red Team");
        assert!(records[0].red_side.is_empty());
    }

    #[tokio::test]
    async fn test_parse_scrim_tabs_keeps_tab_order() {
        let workbook = MockWorkbook::new(&["SCRIM 22/01", "Notes", "scrim 15/01"])
            .with_grid("SCRIM 22/01", vec![header(), full_game()])
            .with_grid("scrim 15/01", vec![header(), full_game(), full_game()]);
        let parser = ScrimTabParser::new(workbook);

        let records = parser.parse_scrim_tabs("wb").await.unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["SCRIM 22/01_1", "scrim 15/01_1", "scrim 15/01_2"]);
        assert_eq!(records[0].date.to_string(), "2024-01-22");
        assert_eq!(records[1].date.to_string(), "2024-01-15");

        let requested = parser.source.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec!["'SCRIM 22/01'!A1:AF50", "'scrim 15/01'!A1:AF50"]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_discards_partial_results() {
        let workbook = MockWorkbook::new(&["SCRIM 15/01", "SCRIM 22/01"])
            .with_grid("SCRIM 15/01", vec![header(), full_game()])
            .failing_on("SCRIM 22/01");
        let parser = ScrimTabParser::new(workbook);

        let err = parser.parse_scrim_tabs("wb").await.unwrap_err();

        assert!(matches!(err, ImportError::RemoteError { .. }));
    }

    #[tokio::test]
    async fn test_tab_with_impossible_date_is_skipped() {
        let workbook = MockWorkbook::new(&["SCRIM 31/02", "SCRIM 15/01"])
            .with_grid("SCRIM 31/02", vec![header(), full_game()])
            .with_grid("SCRIM 15/01", vec![header(), full_game()]);
        let parser = ScrimTabParser::new(workbook);

        let records = parser.parse_scrim_tabs("wb").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "SCRIM 15/01_1");
    }

    #[tokio::test]
    async fn test_empty_workbook_id_is_rejected() {
        let parser = ScrimTabParser::new(MockWorkbook::new(&["SCRIM 15/01"]));
        assert!(parser.parse_scrim_tabs("  ").await.is_err());
    }

    #[test]
    fn test_custom_layout_moves_columns() {
        let layout = ScrimLayout {
            anchor_column: 0,
            team1_column: 0,
            team2_column: 1,
            winner_column: 2,
            blue_side_start: 3,
            red_side_start: 8,
            ..ScrimLayout::default()
        };
        assert!(layout.validate().is_ok());
        let parser = ScrimTabParser::with_layout(MockWorkbook::new(&[]), layout);
        let row: Vec<String> = ["Alpha", "Beta", "Beta", "a1", "a2", "a3", "a4", "a5", "b1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let records = parser.records_from_grid("SCRIM 02/03", date, &[header(), row]);

        assert_eq!(records[0].team1, "Alpha");
        assert_eq!(records[0].winner, "Beta");
        assert_eq!(records[0].blue_side.len(), 5);
        assert_eq!(records[0].red_side, vec!["b1"]);
    }

    #[test]
    fn test_layout_validation() {
        assert!(ScrimLayout::default().validate().is_ok());
        assert_eq!(range_width("A1:AF50"), Some(32));
        assert_eq!(range_width("A1:Z1000"), Some(26));
        assert_eq!(range_width("B1:AF50"), Some(31));
        assert_eq!(range_width("F2:F"), Some(1));
        assert_eq!(range_width("AF1:A50"), None);

        let too_narrow = ScrimLayout {
            cells: "A1:J50".to_string(),
            ..ScrimLayout::default()
        };
        assert!(too_narrow.validate().is_err());

        let oversized_side = ScrimLayout {
            side_size: 6,
            ..ScrimLayout::default()
        };
        assert!(oversized_side.validate().is_err());
    }

    #[test]
    fn test_offset_range_narrows_valid_columns() {
        let shifted = ScrimLayout {
            cells: "B1:AF50".to_string(),
            winner_column: 31,
            ..ScrimLayout::default()
        };
        let err = shifted.validate().unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidConfigValueError { ref field, .. } if field == "layout.winner_column"
        ));

        let fitting = ScrimLayout {
            winner_column: 30,
            ..shifted
        };
        assert!(fitting.validate().is_ok());
    }

    #[test]
    fn test_oversized_column_label_is_config_error() {
        for cells in ["A1:ZZZZZZZZZZZZZZ1", "A1:AAAA50", "AF1:A50"] {
            let layout = ScrimLayout {
                cells: cells.to_string(),
                ..ScrimLayout::default()
            };
            assert!(matches!(
                layout.validate(),
                Err(ImportError::InvalidConfigValueError { ref field, .. }) if field == "layout.cells"
            ));
        }

        assert_eq!(column_number("ZZZ"), Some(18278));
        assert_eq!(column_number("ZZZZZZZZZZZZZZ"), None);
    }
}
