use thiserror::Error;

/// Fatal problems detected before the frame loop starts.
#[derive(Debug, Error)]
pub enum InitError {
    /// The drawing surface (window, canvas, GPU adapter or device) is not available.
    #[error("missing drawing surface: {resource} ({reason})")]
    MissingSurface { resource: String, reason: String },
}

impl InitError {
    pub fn missing(resource: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MissingSurface {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

/// Rejected parameter panel input. Never reaches light or helper state.
#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("unknown control `{0}`")]
    UnknownControl(String),
    #[error("control `{0}` is already bound")]
    DuplicateControl(String),
    #[error("control `{name}` expects a {expected} value")]
    KindMismatch { name: String, expected: &'static str },
    #[error("control `{0}` received a non-finite number")]
    NotFinite(String),
    #[error("`{0}` is not a #rrggbb color")]
    InvalidColor(String),
}
