use notes_service::{config, service::NoteService, startup};

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!(backend = ?cfg.database.backend, "Loaded notes service config");

    // Store creation
    let store = startup::build_store(&cfg.database)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to create database client: {e}");
            panic!("failed to create database client: {e}");
        });

    // Service creation, database provisioning is allowed to fail
    let service = Arc::new(NoteService::new(store));
    startup::init_database(&service).await;

    let router = startup::router(service, cfg.swagger);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .expect("failed to bind to address");
    let addr = listener
        .local_addr()
        .expect("failed to read listener address");

    tracing::info!("Notes service starting, listening on {}", addr);
    if cfg.swagger {
        tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);
    }

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}
