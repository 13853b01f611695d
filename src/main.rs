//! lab-gradebook server entry point.
//!
//! Starts the Axum HTTP server over the gradebook data directory.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use lab_gradebook::api;
use lab_gradebook::api::auth::AdminCredentials;
use lab_gradebook::app_state::AppState;
use lab_gradebook::config::{GradebookConfig, LogFormat};
use lab_gradebook::service::GradebookService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = GradebookConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        "starting lab-gradebook"
    );

    // Build service layer
    let gradebook = Arc::new(GradebookService::open(&config.data_dir));

    // Build application state
    let app_state = AppState {
        gradebook,
        admin: Arc::new(AdminCredentials::new(
            config.admin_user.clone(),
            config.admin_pass.clone(),
        )),
        require_roster_match: config.require_roster_match,
    };

    // Build router
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
