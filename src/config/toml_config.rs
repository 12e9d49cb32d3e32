use crate::adapters::graphql::GraphqlProxyClient;
use crate::adapters::sheets::{SheetFetcher, DEFAULT_SHEETS_BASE_URL};
use crate::core::scrim_parser::{ScrimLayout, ScrimTabParser};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{validate_required_field, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub sheets: SheetsConfig,
    pub relay: RelayConfig,
    pub stats: StatsConfig,
    pub layout: ScrimLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub workbook_id: Option<String>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            api_key: None,
            workbook_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub url: Option<String>,
    /// Bearer credential for the relay itself.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Forwarded by the relay to the statistics provider.
    pub api_key: Option<String>,
}

impl ImportConfig {
    /// Loads a config file, expanding `${VAR}` references.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables become
    /// empty so that a missing credential reads as "not configured".
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                std::env::var(&caps[1]).unwrap_or_default()
            })
            .into_owned()
    }

    pub fn sheet_fetcher(&self) -> SheetFetcher {
        SheetFetcher::new(self.sheets.api_key.clone()).with_base_url(&self.sheets.base_url)
    }

    pub fn scrim_parser(&self) -> ScrimTabParser<SheetFetcher> {
        ScrimTabParser::with_layout(self.sheet_fetcher(), self.layout.clone())
    }

    pub fn workbook_id(&self) -> Result<&str> {
        validate_required_field("sheets.workbook_id", &self.sheets.workbook_id)
    }

    pub fn graphql_client(&self) -> Result<GraphqlProxyClient> {
        let relay_url = validate_required_field("relay.url", &self.relay.url)?;

        Ok(GraphqlProxyClient::new(
            relay_url,
            self.relay.token.clone().unwrap_or_default(),
            self.stats.api_key.clone().unwrap_or_default(),
        ))
    }
}

impl Validate for ImportConfig {
    fn validate(&self) -> Result<()> {
        validate_url("sheets.base_url", &self.sheets.base_url)?;
        if let Some(url) = self.relay.url.as_deref().filter(|u| !u.is_empty()) {
            validate_url("relay.url", url)?;
        }
        self.layout.validate()
    }
}
