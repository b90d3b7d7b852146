use thiserror::Error;

/// Failures the demo surfaces to its host.
///
/// Ticking never fails; these are raised at setup time, before any timer is
/// armed.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("no drawing surface named `{canvas}` in the hosting document")]
    SurfaceNotFound { canvas: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = DemoError> = std::result::Result<T, E>;
