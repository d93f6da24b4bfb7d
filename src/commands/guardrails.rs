use crate::models::guardrail::{
    CategorySpend, GuardrailCreateInput, GuardrailLimit, GuardrailStatus, GuardrailUpdateInput,
};

use super::{run, AppState, CommandResult};

pub fn guardrails_list(state: &AppState, user_id: &str) -> CommandResult<Vec<GuardrailLimit>> {
    run(|| state.guardrails().list(user_id))
}

/// Falls back to the configured notify percentage when the payload omits one.
pub fn guardrails_create(
    state: &AppState,
    user_id: &str,
    payload: GuardrailCreateInput,
) -> CommandResult<GuardrailLimit> {
    run(|| {
        let settings = state.settings().get()?;
        state
            .guardrails()
            .add_with_default(user_id, payload, settings.default_notify_percent)
    })
}

pub fn guardrails_update(
    state: &AppState,
    user_id: &str,
    id: &str,
    payload: GuardrailUpdateInput,
) -> CommandResult<GuardrailLimit> {
    run(|| state.guardrails().update(user_id, id, payload))
}

pub fn guardrails_delete(state: &AppState, user_id: &str, id: &str) -> CommandResult<()> {
    run(|| state.guardrails().delete(user_id, id))
}

pub fn guardrails_toggle(state: &AppState, user_id: &str, id: &str) -> CommandResult<GuardrailLimit> {
    run(|| state.guardrails().toggle(user_id, id))
}

pub fn guardrails_evaluate(
    state: &AppState,
    user_id: &str,
    spending: Vec<CategorySpend>,
) -> CommandResult<Vec<GuardrailStatus>> {
    run(|| state.guardrails().evaluate(user_id, &spending))
}
