use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::store::{read_json, write_json, KeyValueStore};
use crate::error::{AppError, AppResult};
use crate::models::guardrail::{
    CategorySpend, GuardrailCreateInput, GuardrailLimit, GuardrailState, GuardrailStatus,
    GuardrailUpdateInput,
};
use crate::services::settings_service::{ensure_valid_notify_percent, DEFAULT_NOTIFY_PERCENT};
use crate::utils::keys::{guardrails_key, validate_user_id};

/// Spending limits per user, persisted as one JSON array per user.
///
/// Every mutation is a read-modify-write of the whole list.
pub struct GuardrailsStore {
    store: Arc<dyn KeyValueStore>,
}

impl GuardrailsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, user_id: &str) -> AppResult<Vec<GuardrailLimit>> {
        let user_id = validate_user_id(user_id)?;
        self.load(user_id)
    }

    pub fn add(&self, user_id: &str, input: GuardrailCreateInput) -> AppResult<GuardrailLimit> {
        self.add_with_default(user_id, input, DEFAULT_NOTIFY_PERCENT)
    }

    /// Like [`add`](Self::add) with a configured fallback for `notifyAtPercent`.
    pub fn add_with_default(
        &self,
        user_id: &str,
        input: GuardrailCreateInput,
        default_notify_percent: u8,
    ) -> AppResult<GuardrailLimit> {
        let user_id = validate_user_id(user_id)?;
        let category = normalize_category(&input.category)?;
        ensure_valid_amount(input.amount)?;
        let notify_at_percent = input.notify_at_percent.unwrap_or(default_notify_percent);
        ensure_valid_notify_percent(notify_at_percent)?;

        let mut limits = self.load(user_id)?;
        if limits
            .iter()
            .any(|limit| limit.period == input.period && same_category(&limit.category, &category))
        {
            return Err(AppError::conflict(format!(
                "a {} limit for '{}' already exists",
                input.period, category
            )));
        }

        let now = Utc::now().to_rfc3339();
        let limit = GuardrailLimit {
            id: Uuid::new_v4().to_string(),
            category,
            amount: input.amount,
            period: input.period,
            notify_at_percent,
            enabled: input.enabled.unwrap_or(true),
            created_at: now.clone(),
            updated_at: now,
        };
        limits.push(limit.clone());
        self.save(user_id, &limits)?;

        info!(target: "app::guardrails", user_id, id = %limit.id, category = %limit.category, "guardrail added");
        Ok(limit)
    }

    /// Merges the provided fields into the limit with `id`.
    pub fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: GuardrailUpdateInput,
    ) -> AppResult<GuardrailLimit> {
        let user_id = validate_user_id(user_id)?;
        if patch.is_empty() {
            return Err(AppError::validation("no guardrail fields to update"));
        }

        let mut limits = self.load(user_id)?;
        let index = position_of(&limits, id)?;

        let mut updated = limits[index].clone();
        if let Some(category) = patch.category.as_deref() {
            updated.category = normalize_category(category)?;
        }
        if let Some(amount) = patch.amount {
            ensure_valid_amount(amount)?;
            updated.amount = amount;
        }
        if let Some(period) = patch.period {
            updated.period = period;
        }
        if let Some(percent) = patch.notify_at_percent {
            ensure_valid_notify_percent(percent)?;
            updated.notify_at_percent = percent;
        }
        if let Some(enabled) = patch.enabled {
            updated.enabled = enabled;
        }

        let clashes = limits.iter().enumerate().any(|(other, limit)| {
            other != index
                && limit.period == updated.period
                && same_category(&limit.category, &updated.category)
        });
        if clashes {
            return Err(AppError::conflict(format!(
                "a {} limit for '{}' already exists",
                updated.period, updated.category
            )));
        }

        updated.updated_at = Utc::now().to_rfc3339();
        limits[index] = updated.clone();
        self.save(user_id, &limits)?;

        info!(target: "app::guardrails", user_id, id, "guardrail updated");
        Ok(updated)
    }

    pub fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let user_id = validate_user_id(user_id)?;
        let mut limits = self.load(user_id)?;
        let index = position_of(&limits, id)?;
        limits.remove(index);
        self.save(user_id, &limits)?;

        info!(target: "app::guardrails", user_id, id, "guardrail deleted");
        Ok(())
    }

    pub fn toggle(&self, user_id: &str, id: &str) -> AppResult<GuardrailLimit> {
        let user_id = validate_user_id(user_id)?;
        let mut limits = self.load(user_id)?;
        let index = position_of(&limits, id)?;

        let limit = &mut limits[index];
        limit.enabled = !limit.enabled;
        limit.updated_at = Utc::now().to_rfc3339();
        let toggled = limit.clone();
        self.save(user_id, &limits)?;

        info!(target: "app::guardrails", user_id, id, enabled = toggled.enabled, "guardrail toggled");
        Ok(toggled)
    }

    /// Usage of every enabled limit against the spending reported for its category.
    pub fn evaluate(&self, user_id: &str, spending: &[CategorySpend]) -> AppResult<Vec<GuardrailStatus>> {
        let user_id = validate_user_id(user_id)?;
        let limits = self.load(user_id)?;

        let mut spent_by_category: HashMap<String, f64> = HashMap::new();
        for entry in spending {
            if entry.amount.is_finite() {
                *spent_by_category
                    .entry(category_key(&entry.category))
                    .or_insert(0.0) += entry.amount;
            }
        }

        let statuses: Vec<GuardrailStatus> = limits
            .into_iter()
            .filter(|limit| limit.enabled)
            .map(|limit| {
                let spent = spent_by_category
                    .get(&category_key(&limit.category))
                    .copied()
                    .unwrap_or(0.0)
                    .max(0.0);
                evaluate_limit(limit, spent)
            })
            .collect();

        debug!(target: "app::guardrails", user_id, evaluated = statuses.len(), "guardrails evaluated");
        Ok(statuses)
    }

    fn load(&self, user_id: &str) -> AppResult<Vec<GuardrailLimit>> {
        Ok(read_json(self.store.as_ref(), &guardrails_key(user_id))?.unwrap_or_default())
    }

    fn save(&self, user_id: &str, limits: &[GuardrailLimit]) -> AppResult<()> {
        write_json(self.store.as_ref(), &guardrails_key(user_id), limits)
    }
}

pub fn evaluate_limit(limit: GuardrailLimit, spent: f64) -> GuardrailStatus {
    let percent_used = if limit.amount > 0.0 {
        spent * 100.0 / limit.amount
    } else {
        0.0
    };
    let state = if percent_used > 100.0 {
        GuardrailState::Exceeded
    } else if percent_used >= f64::from(limit.notify_at_percent) {
        GuardrailState::Warning
    } else {
        GuardrailState::Ok
    };

    GuardrailStatus {
        remaining: limit.amount - spent,
        spent,
        percent_used,
        state,
        limit,
    }
}

fn position_of(limits: &[GuardrailLimit], id: &str) -> AppResult<usize> {
    limits
        .iter()
        .position(|limit| limit.id == id)
        .ok_or_else(AppError::not_found)
}

fn normalize_category(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("guardrail category cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn ensure_valid_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::validation(
            "guardrail amount must be a positive number",
        ));
    }
    Ok(())
}

fn category_key(category: &str) -> String {
    category.trim().to_lowercase()
}

fn same_category(a: &str, b: &str) -> bool {
    category_key(a) == category_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryKeyValueStore;
    use crate::models::guardrail::GuardrailPeriod;

    fn store() -> GuardrailsStore {
        GuardrailsStore::new(Arc::new(MemoryKeyValueStore::new()))
    }

    fn dining(amount: f64) -> GuardrailCreateInput {
        GuardrailCreateInput {
            category: " Dining ".to_string(),
            amount,
            period: GuardrailPeriod::Monthly,
            notify_at_percent: None,
            enabled: None,
        }
    }

    #[test]
    fn add_assigns_id_and_defaults() {
        let guardrails = store();
        let limit = guardrails.add("u1", dining(200.0)).unwrap();

        assert!(Uuid::parse_str(&limit.id).is_ok());
        assert_eq!(limit.category, "Dining");
        assert_eq!(limit.notify_at_percent, DEFAULT_NOTIFY_PERCENT);
        assert!(limit.enabled);
        assert_eq!(guardrails.list("u1").unwrap(), vec![limit]);
        assert!(guardrails.list("u2").unwrap().is_empty());
    }

    #[test]
    fn add_validates_input() {
        let guardrails = store();
        assert!(guardrails.add("u1", dining(0.0)).is_err());
        assert!(guardrails.add("u1", dining(f64::INFINITY)).is_err());
        assert!(guardrails
            .add(
                "u1",
                GuardrailCreateInput {
                    category: "  ".to_string(),
                    amount: 10.0,
                    ..Default::default()
                }
            )
            .is_err());
        assert!(guardrails
            .add(
                "u1",
                GuardrailCreateInput {
                    notify_at_percent: Some(101),
                    ..dining(10.0)
                }
            )
            .is_err());
        assert!(guardrails.list("u1").unwrap().is_empty());
    }

    #[test]
    fn duplicate_category_and_period_conflicts() {
        let guardrails = store();
        guardrails.add("u1", dining(200.0)).unwrap();
        let duplicate = guardrails.add(
            "u1",
            GuardrailCreateInput {
                category: "dining".to_string(),
                ..dining(50.0)
            },
        );
        assert!(matches!(duplicate, Err(AppError::Conflict { .. })));

        let weekly = guardrails.add(
            "u1",
            GuardrailCreateInput {
                period: GuardrailPeriod::Weekly,
                ..dining(50.0)
            },
        );
        assert!(weekly.is_ok());
    }

    #[test]
    fn update_merges_fields_by_id() {
        let guardrails = store();
        let limit = guardrails.add("u1", dining(200.0)).unwrap();

        let updated = guardrails
            .update(
                "u1",
                &limit.id,
                GuardrailUpdateInput {
                    amount: Some(250.0),
                    notify_at_percent: Some(90),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, limit.id);
        assert_eq!(updated.category, limit.category);
        assert_eq!(updated.amount, 250.0);
        assert_eq!(updated.notify_at_percent, 90);
        assert_eq!(updated.created_at, limit.created_at);
        assert_eq!(guardrails.list("u1").unwrap(), vec![updated]);

        assert!(guardrails
            .update("u1", &limit.id, GuardrailUpdateInput::default())
            .is_err());
        assert!(matches!(
            guardrails.update(
                "u1",
                "missing",
                GuardrailUpdateInput {
                    enabled: Some(false),
                    ..Default::default()
                }
            ),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn add_then_delete_restores_previous_list() {
        let guardrails = store();
        guardrails.add("u1", dining(200.0)).unwrap();
        let before = guardrails.list("u1").unwrap();

        let added = guardrails
            .add(
                "u1",
                GuardrailCreateInput {
                    category: "Travel".to_string(),
                    amount: 500.0,
                    ..Default::default()
                },
            )
            .unwrap();
        guardrails.delete("u1", &added.id).unwrap();

        assert_eq!(guardrails.list("u1").unwrap(), before);
        assert!(matches!(guardrails.delete("u1", &added.id), Err(AppError::NotFound)));
    }

    #[test]
    fn toggle_flips_enabled() {
        let guardrails = store();
        let limit = guardrails.add("u1", dining(200.0)).unwrap();

        assert!(!guardrails.toggle("u1", &limit.id).unwrap().enabled);
        assert!(guardrails.toggle("u1", &limit.id).unwrap().enabled);
    }

    #[test]
    fn evaluate_reports_usage_for_enabled_limits() {
        let guardrails = store();
        let dining_limit = guardrails.add("u1", dining(200.0)).unwrap();
        let travel = guardrails
            .add(
                "u1",
                GuardrailCreateInput {
                    category: "Travel".to_string(),
                    amount: 100.0,
                    ..Default::default()
                },
            )
            .unwrap();
        let fuel = guardrails
            .add(
                "u1",
                GuardrailCreateInput {
                    category: "Fuel".to_string(),
                    amount: 100.0,
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let spending = vec![
            CategorySpend {
                category: "dining".to_string(),
                amount: 120.0,
            },
            CategorySpend {
                category: "DINING".to_string(),
                amount: 50.0,
            },
            CategorySpend {
                category: "travel".to_string(),
                amount: 130.0,
            },
            CategorySpend {
                category: "fuel".to_string(),
                amount: 500.0,
            },
        ];

        let statuses = guardrails.evaluate("u1", &spending).unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|status| status.limit.id != fuel.id));

        let dining_status = statuses
            .iter()
            .find(|status| status.limit.id == dining_limit.id)
            .unwrap();
        assert_eq!(dining_status.spent, 170.0);
        assert_eq!(dining_status.percent_used, 85.0);
        assert_eq!(dining_status.state, GuardrailState::Warning);

        let travel_status = statuses
            .iter()
            .find(|status| status.limit.id == travel.id)
            .unwrap();
        assert_eq!(travel_status.state, GuardrailState::Exceeded);
        assert_eq!(travel_status.remaining, -30.0);
    }
}
