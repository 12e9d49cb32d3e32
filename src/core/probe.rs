use crate::domain::model::ProbeResult;
use crate::domain::ports::GraphqlTransport;
use crate::utils::error::{ErrorCategory, ImportError};

pub const LEAGUES_QUERY: &str = "query { leagues { id name } }";

pub const CONNECTED_MESSAGE: &str = "Connection to the statistics API established";
pub const CONNECTIVITY_MESSAGE: &str = "Connection error. Check the API key and try again.";

pub struct ConnectionProber<T: GraphqlTransport> {
    transport: T,
}

impl<T: GraphqlTransport> ConnectionProber<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Checks that the relay accepts the configured API key. Errors are
    /// folded into the returned result.
    pub async fn probe(&self) -> ProbeResult {
        match self.transport.call(LEAGUES_QUERY, None).await {
            Ok(_) => ProbeResult {
                accepted: true,
                message: CONNECTED_MESSAGE.to_string(),
            },
            Err(e) => {
                tracing::warn!("Connection probe rejected: {}", e);
                ProbeResult {
                    accepted: false,
                    message: rejection_message(&e),
                }
            }
        }
    }
}

fn rejection_message(error: &ImportError) -> String {
    match error {
        ImportError::RemoteError { message } => message.clone(),
        e if e.category() == ErrorCategory::Configuration => e.to_string(),
        _ => CONNECTIVITY_MESSAGE.to_string(),
    }
}
