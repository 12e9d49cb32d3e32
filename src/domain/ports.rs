use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only access to a spreadsheet workbook.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Tab titles in the order the workbook metadata lists them.
    async fn list_tabs(&self, workbook_id: &str) -> Result<Vec<String>>;

    /// Cell grid for an A1-style range. Rows are ragged; a missing `values`
    /// field yields an empty grid.
    async fn fetch_range(&self, workbook_id: &str, range: &str) -> Result<Vec<Vec<String>>>;
}

/// Sends one GraphQL document and returns the raw JSON body.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn call(&self, query: &str, variables: Option<Value>) -> Result<Value>;
}
