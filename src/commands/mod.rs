//! Transport-agnostic command surface.
//!
//! Each command takes the shared [`AppState`] plus plain inputs and returns a
//! serializable value or a [`CommandError`] envelope, so an HTTP or webview
//! host can expose them one-to-one.

pub mod guardrails;
pub mod settings;
pub mod wellness;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::db::repositories::wellness_score_repository::WellnessScoreRepository;
use crate::db::store::{KeyValueStore, SqliteKeyValueStore};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::financial_data_service::FinancialDataService;
use crate::services::guardrails_service::GuardrailsStore;
use crate::services::settings_service::SettingsService;
use crate::services::wellness_score_service::WellnessScoreService;
use crate::utils::keys::{guardrails_key, snapshot_key, validate_user_id};

#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    store: Arc<dyn KeyValueStore>,
    settings_service: Arc<SettingsService>,
    financial_data_service: Arc<FinancialDataService>,
    wellness_service: Arc<WellnessScoreService>,
    guardrails_store: Arc<GuardrailsStore>,
}

impl AppState {
    /// State backed entirely by the SQLite database.
    pub fn new(db_pool: DbPool) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(db_pool.clone()));
        Self::with_store(db_pool, store)
    }

    /// Keeps score history in `db_pool` and per-user blobs in `store`.
    pub fn with_store(db_pool: DbPool, store: Arc<dyn KeyValueStore>) -> Self {
        let settings_service = Arc::new(SettingsService::new(db_pool.clone()));
        let financial_data_service = Arc::new(FinancialDataService::new(Arc::clone(&store)));
        let wellness_service = Arc::new(WellnessScoreService::new(
            db_pool.clone(),
            Arc::clone(&financial_data_service),
            Arc::clone(&settings_service),
        ));
        let guardrails_store = Arc::new(GuardrailsStore::new(Arc::clone(&store)));

        Self {
            db_pool,
            store,
            settings_service,
            financial_data_service,
            wellness_service,
            guardrails_store,
        }
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn financial_data(&self) -> Arc<FinancialDataService> {
        Arc::clone(&self.financial_data_service)
    }

    pub fn wellness(&self) -> Arc<WellnessScoreService> {
        Arc::clone(&self.wellness_service)
    }

    pub fn guardrails(&self) -> Arc<GuardrailsStore> {
        Arc::clone(&self.guardrails_store)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }

    /// Removes the snapshot, guardrails and score history of `user_id`; settings are kept.
    pub fn clear_user_data(&self, user_id: &str) -> AppResult<UserDataClearResult> {
        let user_id = validate_user_id(user_id)?;
        let mut result = UserDataClearResult::default();

        for key in [snapshot_key(user_id), guardrails_key(user_id)] {
            if self.store.remove(&key)? {
                result.storage_keys_cleared += 1;
            }
        }

        result.wellness_scores_cleared = self
            .db_pool
            .with_connection(|conn| WellnessScoreRepository::delete_for_user(conn, user_id))?;

        info!(
            target: "app::command",
            user_id,
            storage_keys = result.storage_keys_cleared,
            wellness_scores = result.wellness_scores_cleared,
            "user data cleared"
        );
        Ok(result)
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataClearResult {
    pub storage_keys_cleared: usize,
    pub wellness_scores_cleared: usize,
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::NotFound => {
                CommandError::new("NOT_FOUND", "the requested resource does not exist", None)
            }
            AppError::Conflict { message } => CommandError::new("CONFLICT", message, None),
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "failed to serialize data", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

pub fn user_data_clear(state: &AppState, user_id: &str) -> CommandResult<UserDataClearResult> {
    run(|| state.clear_user_data(user_id))
}

fn run<T>(task: impl FnOnce() -> AppResult<T>) -> CommandResult<T> {
    task().map_err(CommandError::from)
}
