use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleetchat::config::{settings::Settings, storage};
use fleetchat::modules::session::{crud::SessionCrud, manager::SessionManager};
use fleetchat::services::chat::ChatClient;
use fleetchat::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fleetchat=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let store = storage::connect(&settings.storage).await?;
    let client = ChatClient::from_settings(&settings)?;
    info!(url = %client.base_url(), timeout = ?settings.chat_timeout, "Chat backend configured");

    let sessions = SessionManager::load(SessionCrud::new(store), Arc::new(client)).await;
    let app = app(AppState { sessions });

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Listening on {}", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
