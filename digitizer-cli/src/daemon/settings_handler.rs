use super::DaemonState;
use crate::protocol::DaemonResponse;
use digitizer_core::SettingsManager;

pub fn settings_show(settings: &SettingsManager) -> DaemonResponse {
    DaemonResponse::Settings {
        settings: settings.defaults().clone(),
    }
}

/// Persists a defaults patch; tabs opened afterwards pick it up.
pub fn settings_set(state: &mut DaemonState, json: &str) -> DaemonResponse {
    match state.settings.apply_settings_json(json) {
        Ok(()) => {
            state
                .sessions
                .set_template(state.settings.defaults().clone());
            settings_show(&state.settings)
        }
        Err(message) => DaemonResponse::Error { message },
    }
}

pub fn settings_reset(state: &mut DaemonState) -> DaemonResponse {
    match state.settings.reset_to_factory() {
        Ok(()) => {
            state
                .sessions
                .set_template(state.settings.defaults().clone());
            DaemonResponse::Ok {
                message: "Settings restored to factory defaults".to_string(),
            }
        }
        Err(message) => DaemonResponse::Error { message },
    }
}
