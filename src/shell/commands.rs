//! Commands invoked by the overlay frontend. Synchronous commands run on the
//! main thread, which is where the orchestrator expects to be driven.

use tauri::State;

use super::HintState;
use crate::hints::{KeyInput, KeyOutcome};

fn dispatch(state: &HintState, input: KeyInput) -> Result<KeyOutcome, String> {
    let outcome = state.with_orchestrator(|o| o.handle_key(input))?;
    if let KeyOutcome::ModeChanged(continuous) = outcome {
        state.mode_changed(continuous);
    }
    tracing::debug!(?input, ?outcome, "overlay key");
    Ok(outcome)
}

#[tauri::command]
pub fn hint_key(state: State<'_, HintState>, key: String) -> Result<(), String> {
    let input = KeyInput::from_key_name(&key).ok_or_else(|| format!("not a hint key: {key:?}"))?;
    dispatch(&state, input).map(|_| ())
}

#[tauri::command]
pub fn hint_cancel(state: State<'_, HintState>) -> Result<(), String> {
    dispatch(&state, KeyInput::Cancel).map(|_| ())
}

#[tauri::command]
pub fn hint_toggle_mode(state: State<'_, HintState>) -> Result<bool, String> {
    dispatch(&state, KeyInput::ToggleMode)?;
    state.with_orchestrator(|o| o.is_continuous())
}
