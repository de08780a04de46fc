pub mod dynamic;
pub mod entities;
pub mod guard;
pub mod pool;
pub mod submissions;

pub use entities::EntityDirectory;
pub use pool::create_pool;

use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;

/// Open the database described by `config` and bring the catalog up to date
///
/// Creates the parent directory of a file-backed database on first run.
pub async fn open_database(config: &Config) -> Result<SqlitePool> {
    let db_file = database_file(&config.database_url);
    if let Some(parent) = db_file.as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                sqlx::Error::Io(e)
            })?;
        }
    }

    let pool = create_pool(
        &config.database_url,
        config.database_max_connections,
        Duration::from_secs(config.database_busy_timeout_secs),
    )
    .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(pool)
}

/// File path of a `sqlite:` URL, `None` for in-memory databases
fn database_file(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
