use std::sync::Arc;

use picasso_proxy::{api, config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    picasso_proxy::init_tracing();

    // Load configuration; a missing credential only fails generation requests
    config::Config::dotenv_load();
    let config = config::Config::new();
    config.log_summary();
    if config.credential.is_none() {
        tracing::warn!("HF_APIKEY is not set; every generation request will fail with a configuration error");
    }

    let state = Arc::new(api::routes::AppState::from_config(&config));
    let app = api::routes::router(state);

    let socket_address = config.socket_address();
    tracing::info!("listening on {}", socket_address);
    axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
