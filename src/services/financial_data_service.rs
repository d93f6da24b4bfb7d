use std::sync::Arc;

use tracing::{info, warn};

use crate::db::store::{read_json, write_json, KeyValueStore};
use crate::error::AppResult;
use crate::models::snapshot::FinancialSnapshot;
use crate::utils::keys::{snapshot_key, validate_user_id};

/// Where a snapshot handed to the engine came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Stored,
    Sample,
}

/// Per-user financial snapshots stored as JSON blobs.
pub struct FinancialDataService {
    store: Arc<dyn KeyValueStore>,
}

impl FinancialDataService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, user_id: &str) -> AppResult<Option<FinancialSnapshot>> {
        let user_id = validate_user_id(user_id)?;
        read_json(self.store.as_ref(), &snapshot_key(user_id))
    }

    pub fn save(&self, user_id: &str, snapshot: &FinancialSnapshot) -> AppResult<()> {
        let user_id = validate_user_id(user_id)?;
        write_json(self.store.as_ref(), &snapshot_key(user_id), snapshot)?;
        info!(target: "app::wellness", user_id, "financial snapshot saved");
        Ok(())
    }

    pub fn delete(&self, user_id: &str) -> AppResult<bool> {
        let user_id = validate_user_id(user_id)?;
        self.store.remove(&snapshot_key(user_id))
    }

    /// The stored snapshot, or the sample dataset when it is missing or unreadable.
    ///
    /// Only an invalid user id is reported as an error.
    pub fn load_or_sample(&self, user_id: &str) -> AppResult<(FinancialSnapshot, SnapshotSource)> {
        let user_id = validate_user_id(user_id)?;
        match read_json::<FinancialSnapshot>(self.store.as_ref(), &snapshot_key(user_id)) {
            Ok(Some(snapshot)) => Ok((snapshot, SnapshotSource::Stored)),
            Ok(None) => {
                warn!(target: "app::wellness", user_id, "no stored snapshot, using sample data");
                Ok((FinancialSnapshot::sample(), SnapshotSource::Sample))
            }
            Err(error) => {
                warn!(
                    target: "app::wellness",
                    user_id,
                    error = %error,
                    "failed to load snapshot, using sample data"
                );
                Ok((FinancialSnapshot::sample(), SnapshotSource::Sample))
            }
        }
    }
}
