use crate::context::ShaderStage;

/// Failures surfaced by the lifecycle helpers.
///
/// Every variant is recoverable: a failure aborts the current demo's setup
/// and leaves the host free to tear down and try another demo. The driver
/// diagnostic log, when one exists, rides along in the variant.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
    #[error("vertex attribute '{name}' not found in the linked program")]
    AttributeNotFound { name: String },
    #[error("{stage} shader source is empty")]
    EmptySource { stage: ShaderStage },
    #[error("invalid attribute layout: {reason}")]
    InvalidLayout { reason: String },
    #[error("graphics context unavailable: {reason}")]
    ContextUnavailable { reason: String },
}

impl SurfaceError {
    /// Driver log attached to the failure, when the backend produced one.
    pub fn diagnostic_log(&self) -> Option<&str> {
        match self {
            SurfaceError::Compile { log, .. } | SurfaceError::Link { log } => Some(log),
            _ => None,
        }
    }
}
