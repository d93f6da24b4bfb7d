pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::Path;

use tracing::info;

use crate::commands::AppState;
use crate::db::DbPool;
use crate::error::AppResult;

/// Prepares `data_dir`, starts logging under `data_dir/logs` and opens the database.
pub fn bootstrap(data_dir: &Path) -> AppResult<AppState> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    crate::utils::logger::init_logging(&log_dir)?;

    let pool = DbPool::in_dir(data_dir)?;
    info!(target: "app::bootstrap", path = %pool.path().display(), "database ready");

    Ok(AppState::new(pool))
}
