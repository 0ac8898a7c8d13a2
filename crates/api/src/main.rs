use anyhow::Context;

use stockledger_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockledger_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = stockledger_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
