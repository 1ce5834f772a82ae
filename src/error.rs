use thiserror::Error;

use crate::hints::Pid;

#[derive(Debug, Error)]
pub enum HintError {
    #[error("accessibility access has not been granted")]
    NotTrusted,

    #[error("no frontmost application")]
    NoFrontmostApp,

    #[error("application {0} exposes no windows")]
    NoWindows(Pid),

    #[error("no clickable elements found")]
    NoCandidates,

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("label index {index} exceeds alphabet capacity {capacity}")]
    LabelCapacity { index: usize, capacity: usize },

    #[error("accessibility action `{action}` failed (AXError {code})")]
    ActionFailed { action: String, code: i32 },

    #[error("element is no longer available")]
    StaleElement,

    #[error("failed to activate process {0}")]
    ActivateProcess(Pid),

    #[error("failed to synthesize click: {0}")]
    SyntheticClick(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config dir not found")]
    NoConfigDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
