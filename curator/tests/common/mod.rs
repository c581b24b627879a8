// Common test utilities for integration tests
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Once};

use curator::api::{create_router, AppState};
use curator::config::Config;
use curator::db::{Database, DatabaseBackend, LibSqlBackend};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Spawns the full router on an ephemeral port over an in-memory database.
/// Returns the bound address and a handle to the backing database so tests
/// can seed or inspect rows directly.
pub async fn setup_test_app(tokens: &[(&str, &str)]) -> (SocketAddr, Database) {
    init_test_logger();

    let mut config = Config::default();
    config.database.url = ":memory:".to_string();
    config.server.api_tokens = tokens
        .iter()
        .map(|(token, user)| (token.to_string(), user.to_string()))
        .collect::<HashMap<_, _>>();

    let db = Database::new(&config.database)
        .await
        .expect("Failed to create database");
    let backend: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(db.clone()));

    let state = AppState::new(config, backend);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (addr, db)
}
