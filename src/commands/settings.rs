use crate::models::settings::EngineSettings;
use crate::services::settings_service::SettingsUpdateInput;

use super::{run, AppState, CommandResult};

pub fn settings_get(state: &AppState) -> CommandResult<EngineSettings> {
    run(|| state.settings().get())
}

pub fn settings_update(
    state: &AppState,
    payload: SettingsUpdateInput,
) -> CommandResult<EngineSettings> {
    run(|| state.settings().update(payload))
}
