use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::EngineSettings;
use crate::services::recommendation_service::{DEFAULT_DISPLAY_LIMIT, DEFAULT_RECOMMENDATION_THRESHOLD};

const KEY_RECOMMENDATION_THRESHOLD: &str = "recommendation_threshold";
const KEY_DISPLAY_LIMIT: &str = "recommendation_display_limit";
const KEY_DEFAULT_NOTIFY_PERCENT: &str = "default_notify_percent";

pub const DEFAULT_NOTIFY_PERCENT: u8 = 80;
const MAX_DISPLAY_LIMIT: usize = 7;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdateInput {
    #[serde(default)]
    pub recommendation_threshold: Option<f64>,
    #[serde(default)]
    pub recommendation_display_limit: Option<usize>,
    #[serde(default)]
    pub default_notify_percent: Option<u8>,
}

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<EngineSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<EngineSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_settings_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<EngineSettings> {
        let mut current = self.get()?;
        let mut changes: Vec<(&str, String)> = Vec::new();

        if let Some(threshold) = input.recommendation_threshold {
            ensure_valid_threshold(threshold)?;
            current.recommendation_threshold = threshold;
            changes.push((KEY_RECOMMENDATION_THRESHOLD, threshold.to_string()));
        }

        if let Some(limit) = input.recommendation_display_limit {
            ensure_valid_display_limit(limit)?;
            current.recommendation_display_limit = limit;
            changes.push((KEY_DISPLAY_LIMIT, limit.to_string()));
        }

        if let Some(percent) = input.default_notify_percent {
            ensure_valid_notify_percent(percent)?;
            current.default_notify_percent = percent;
            changes.push((KEY_DEFAULT_NOTIFY_PERCENT, percent.to_string()));
        }

        if changes.is_empty() {
            return Ok(current);
        }

        self.db
            .with_connection(|conn| SettingsRepository::upsert_many(conn, &changes))?;
        current.updated_at = Utc::now().to_rfc3339();
        info!(target: "app::settings", changed = changes.len(), "engine settings updated");

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }

        Ok(current)
    }

    fn load_settings_from_db(&self) -> AppResult<EngineSettings> {
        let (stored, updated_at) = self.db.with_connection(|conn| {
            Ok((
                SettingsRepository::load_all(conn)?,
                SettingsRepository::last_updated(conn)?,
            ))
        })?;

        Ok(EngineSettings {
            recommendation_threshold: parse_or_default(
                &stored,
                KEY_RECOMMENDATION_THRESHOLD,
                DEFAULT_RECOMMENDATION_THRESHOLD,
                |value: &f64| ensure_valid_threshold(*value).is_ok(),
            ),
            recommendation_display_limit: parse_or_default(
                &stored,
                KEY_DISPLAY_LIMIT,
                DEFAULT_DISPLAY_LIMIT,
                |value: &usize| ensure_valid_display_limit(*value).is_ok(),
            ),
            default_notify_percent: parse_or_default(
                &stored,
                KEY_DEFAULT_NOTIFY_PERCENT,
                DEFAULT_NOTIFY_PERCENT,
                |value: &u8| ensure_valid_notify_percent(*value).is_ok(),
            ),
            updated_at: updated_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
        })
    }
}

/// Unparseable or out-of-range stored values fall back to the default.
fn parse_or_default<T>(
    stored: &HashMap<String, String>,
    key: &str,
    default: T,
    is_valid: impl Fn(&T) -> bool,
) -> T
where
    T: std::str::FromStr,
{
    match stored.get(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) if is_valid(&value) => value,
            _ => {
                warn!(target: "app::settings", key, raw = %raw, "ignoring invalid stored setting");
                default
            }
        },
    }
}

fn ensure_valid_threshold(value: f64) -> AppResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AppError::validation(
            "recommendation threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

fn ensure_valid_display_limit(value: usize) -> AppResult<()> {
    if !(1..=MAX_DISPLAY_LIMIT).contains(&value) {
        return Err(AppError::validation_with_details(
            "recommendation display limit out of range",
            serde_json::json!({ "min": 1, "max": MAX_DISPLAY_LIMIT }),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_valid_notify_percent(value: u8) -> AppResult<()> {
    if !(1..=100).contains(&value) {
        return Err(AppError::validation(
            "notify percent must be between 1 and 100",
        ));
    }
    Ok(())
}
