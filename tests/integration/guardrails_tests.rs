// Guardrails persistence and evaluation against the SQLite-backed store

use std::sync::Arc;

use stackr_finance_lib::db::store::{KeyValueStore, SqliteKeyValueStore};
use stackr_finance_lib::db::DbPool;
use stackr_finance_lib::error::AppError;
use stackr_finance_lib::models::guardrail::{
    CategorySpend, GuardrailCreateInput, GuardrailPeriod, GuardrailState, GuardrailUpdateInput,
};
use stackr_finance_lib::services::guardrails_service::GuardrailsStore;
use stackr_finance_lib::utils::keys::guardrails_key;
use tempfile::tempdir;

fn setup_store() -> (GuardrailsStore, Arc<SqliteKeyValueStore>, DbPool, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("test.sqlite")).expect("db pool");
    let kv = Arc::new(SqliteKeyValueStore::new(pool.clone()));
    (GuardrailsStore::new(kv.clone()), kv, pool, dir)
}

fn limit(category: &str, amount: f64) -> GuardrailCreateInput {
    GuardrailCreateInput {
        category: category.to_string(),
        amount,
        ..Default::default()
    }
}

#[test]
fn test_limits_survive_reopening_the_database() {
    let (guardrails, _kv, pool, _dir) = setup_store();
    let groceries = guardrails
        .add("user-1", limit("Groceries", 600.0))
        .expect("add groceries");

    let reopened = GuardrailsStore::new(Arc::new(SqliteKeyValueStore::new(
        DbPool::new(pool.path()).expect("reopen pool"),
    )));
    assert_eq!(reopened.list("user-1").expect("list"), vec![groceries]);
}

#[test]
fn test_add_then_delete_restores_stored_list() {
    let (guardrails, kv, _pool, _dir) = setup_store();
    guardrails
        .add("user-1", limit("Groceries", 600.0))
        .expect("add groceries");
    guardrails
        .add("user-1", limit("Dining", 150.0))
        .expect("add dining");

    let before_list = guardrails.list("user-1").expect("list");
    let before_raw = kv.get(&guardrails_key("user-1")).expect("raw value");

    let added = guardrails
        .add("user-1", limit("Travel", 900.0))
        .expect("add travel");
    assert_eq!(guardrails.list("user-1").expect("list").len(), 3);

    guardrails.delete("user-1", &added.id).expect("delete travel");

    assert_eq!(guardrails.list("user-1").expect("list"), before_list);
    assert_eq!(kv.get(&guardrails_key("user-1")).expect("raw value"), before_raw);
}

#[test]
fn test_users_do_not_share_limits() {
    let (guardrails, _kv, _pool, _dir) = setup_store();
    let mine = guardrails
        .add("alice", limit("Dining", 100.0))
        .expect("add for alice");

    assert!(guardrails.list("bob").expect("list bob").is_empty());
    assert!(matches!(
        guardrails.delete("bob", &mine.id),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        guardrails.toggle("bob", &mine.id),
        Err(AppError::NotFound)
    ));
}

#[test]
fn test_update_rejects_clashing_category_and_period() {
    let (guardrails, _kv, _pool, _dir) = setup_store();
    let monthly = guardrails
        .add("user-1", limit("Dining", 400.0))
        .expect("add monthly");
    guardrails
        .add(
            "user-1",
            GuardrailCreateInput {
                period: GuardrailPeriod::Weekly,
                ..limit("Dining", 100.0)
            },
        )
        .expect("add weekly");

    let clash = guardrails.update(
        "user-1",
        &monthly.id,
        GuardrailUpdateInput {
            period: Some(GuardrailPeriod::Weekly),
            ..Default::default()
        },
    );
    assert!(matches!(clash, Err(AppError::Conflict { .. })));

    let renamed = guardrails
        .update(
            "user-1",
            &monthly.id,
            GuardrailUpdateInput {
                category: Some("Restaurants".to_string()),
                period: Some(GuardrailPeriod::Weekly),
                amount: Some(120.0),
                ..Default::default()
            },
        )
        .expect("move to weekly under a new category");
    assert_eq!(renamed.category, "Restaurants");
    assert_eq!(renamed.period, GuardrailPeriod::Weekly);
    assert_eq!(renamed.amount, 120.0);
}

#[test]
fn test_evaluate_tracks_notify_threshold_and_disabled_limits() {
    let (guardrails, _kv, _pool, _dir) = setup_store();
    let dining = guardrails
        .add(
            "user-1",
            GuardrailCreateInput {
                notify_at_percent: Some(50),
                ..limit("Dining", 200.0)
            },
        )
        .expect("add dining");
    let groceries = guardrails
        .add("user-1", limit("Groceries", 500.0))
        .expect("add groceries");

    let spending = vec![
        CategorySpend {
            category: "Dining".to_string(),
            amount: 100.0,
        },
        CategorySpend {
            category: "Groceries".to_string(),
            amount: 120.0,
        },
    ];

    let statuses = guardrails.evaluate("user-1", &spending).expect("evaluate");
    assert_eq!(statuses.len(), 2);
    let dining_status = statuses
        .iter()
        .find(|status| status.limit.id == dining.id)
        .expect("dining status");
    assert_eq!(dining_status.percent_used, 50.0);
    assert_eq!(dining_status.state, GuardrailState::Warning);

    let groceries_status = statuses
        .iter()
        .find(|status| status.limit.id == groceries.id)
        .expect("groceries status");
    assert_eq!(groceries_status.state, GuardrailState::Ok);
    assert_eq!(groceries_status.remaining, 380.0);

    guardrails
        .toggle("user-1", &dining.id)
        .expect("disable dining");
    let statuses = guardrails.evaluate("user-1", &spending).expect("evaluate");
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].limit.id, groceries.id);
}
