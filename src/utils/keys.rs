use crate::error::{AppError, AppResult};

const MAX_USER_ID_LEN: usize = 128;

/// Accepts non-empty ASCII ids made of alphanumerics, `-` and `_`.
pub fn validate_user_id(user_id: &str) -> AppResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("user id cannot be empty"));
    }
    if trimmed.len() > MAX_USER_ID_LEN {
        return Err(AppError::validation_with_details(
            "user id is too long",
            serde_json::json!({ "maxLength": MAX_USER_ID_LEN }),
        ));
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(AppError::validation(
            "user id may only contain letters, digits, '-' or '_'",
        ));
    }
    Ok(trimmed)
}

pub fn guardrails_key(user_id: &str) -> String {
    format!("stackr-guardrails-{user_id}")
}

pub fn snapshot_key(user_id: &str) -> String {
    format!("{user_id}_financial_snapshot")
}
