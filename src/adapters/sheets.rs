use crate::domain::ports::SheetSource;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct WorkbookMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Key-authenticated reader for the spreadsheet values API.
#[derive(Debug, Clone)]
pub struct SheetFetcher {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SheetFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, workbook_id: &str, segments: &[&str]) -> Result<Url> {
        let key = validate_required_field("sheets.api_key", &self.api_key)?;
        validate_non_empty_string("workbook_id", workbook_id)?;

        let mut url = Url::parse(&self.base_url).map_err(|e| ImportError::InvalidConfigValueError {
            field: "sheets.base_url".to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ImportError::config("sheets.base_url cannot carry a path"))?
            .pop_if_empty()
            .push(workbook_id)
            .extend(segments);
        url.query_pairs_mut().append_pair("key", key);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}{}", url.origin().ascii_serialization(), url.path());
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Spreadsheet API response status: {}", status);

        if !status.is_success() {
            return Err(ImportError::remote(format!(
                "Spreadsheet API error: {} ({})",
                status.canonical_reason().unwrap_or("Unknown status"),
                status.as_u16()
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SheetSource for SheetFetcher {
    async fn list_tabs(&self, workbook_id: &str) -> Result<Vec<String>> {
        let url = self.endpoint(workbook_id, &[])?;
        let metadata: WorkbookMetadata = self.get_json(url).await?;

        Ok(metadata
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    async fn fetch_range(&self, workbook_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.endpoint(workbook_id, &["values", range])?;
        let value_range: ValueRange = self.get_json(url).await?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}
