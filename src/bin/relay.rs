use anyhow::Context;
use clap::Parser;
use scrim_import::adapters::relay::{create_router, RelayState, DEFAULT_UPSTREAM_URL};
use scrim_import::utils::logger;
use scrim_import::utils::validation::validate_url;

#[derive(Debug, Parser)]
#[command(name = "relay")]
#[command(about = "Forwards GraphQL calls to the statistics API")]
struct RelayArgs {
    #[arg(long, env = "RELAY_BIND", default_value = "0.0.0.0:8787")]
    bind: String,

    #[arg(long, env = "RELAY_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Callers must present this as a bearer token when set
    #[arg(long, env = "RELAY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = RelayArgs::parse();
    logger::init_relay_logger();

    validate_url("upstream_url", &args.upstream_url)?;
    if args.access_token.is_none() {
        tracing::warn!("RELAY_ACCESS_TOKEN not set; relay accepts unauthenticated callers");
    }

    let router = create_router(RelayState::new(&args.upstream_url, args.access_token));
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;

    tracing::info!("Relay listening on {} -> {}", args.bind, args.upstream_url);
    axum::serve(listener, router).await?;
    Ok(())
}
