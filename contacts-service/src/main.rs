use anyhow::Context;
use contacts_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    tracing::info!(
        environment = %config.service.environment,
        surrealdb = %contacts_service::store::sanitize_url(&config.surrealdb.url),
        "Opening contact store"
    );

    let state = AppState::connect(config.clone())
        .await
        .context("failed to open contact store")?;

    Server::new(config).serve(app(state)).await?;

    tracing::info!("Service stopped");

    Ok(())
}
