use std::sync::Arc;

use atelier_api::app::services::AppServices;
use atelier_api::config::Config;
use atelier_auth::TokenSigner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atelier_observability::init();

    let config = Config::from_env()?;

    let pool = atelier_infra::connect(&config.database_url).await?;
    let signer = TokenSigner::new(&config.jwt_secret, config.token_expiry);
    let services = Arc::new(AppServices::new(pool.clone(), signer));

    atelier_infra::spawn_session_sweeper(pool, config.session_sweep);

    let app = atelier_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
