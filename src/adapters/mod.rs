// Adapters layer: concrete HTTP clients for the spreadsheet API and the GraphQL relay.

pub mod graphql;
pub mod sheets;

#[cfg(feature = "relay")]
pub mod relay;
