use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    conn: Connection,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let busy_timeout_ms = std::env::var("DATABASE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5000);

        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            if let Some(ref local_path) = config.local_path {
                Builder::new_remote_replica(
                    local_path,
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            } else {
                Builder::new_remote(
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        // One connection for the lifetime of the handle. A fresh connect()
        // per operation would give every caller of an in-memory database its
        // own empty database, losing the schema applied below.
        let conn = db.connect()?;
        configure_connection(&conn, busy_timeout_ms).await;
        schema::init_schema(&conn).await?;

        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    pub async fn sync(&self) -> Result<()> {
        if let Ok(sync) = self.db.sync().await {
            tracing::debug!("Database synced: {:?}", sync);
        }
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            conn: self.conn.clone(),
        }
    }
}

async fn configure_connection(conn: &Connection, busy_timeout_ms: u64) {
    let busy_timeout_sql = format!("PRAGMA busy_timeout = {busy_timeout_ms}");
    if let Err(error) = conn.execute_batch(&busy_timeout_sql).await {
        tracing::warn!(
            busy_timeout_ms,
            error = %error,
            "Failed to set SQLite busy_timeout"
        );
    }

    if let Err(error) = conn.execute_batch("PRAGMA journal_mode = WAL").await {
        tracing::warn!(error = %error, "Failed to set SQLite journal_mode");
    }
}
