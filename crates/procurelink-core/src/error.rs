use thiserror::Error;

/// Validation failures raised when a procurement record is saved.
///
/// These are the only errors a caller is expected to show to a user; every
/// other failure in the procurement flow is best-effort and gets logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("incomplete target reference: {0}")]
    IncompleteTargetReference(&'static str),

    #[error("unregistered target type '{target_type}' (available: {available})")]
    UnregisteredTargetType {
        target_type: String,
        available: String,
    },
}

impl ValidationError {
    /// A target type was given without an id.
    pub fn missing_target_id() -> Self {
        Self::IncompleteTargetReference("a target type requires a target id")
    }

    /// A target id was given without a type.
    pub fn missing_target_type() -> Self {
        Self::IncompleteTargetReference("a target id requires a target type")
    }

    pub fn unregistered_target_type(
        target_type: impl Into<String>,
        available: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let available = available
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .collect::<Vec<_>>();
        Self::UnregisteredTargetType {
            target_type: target_type.into(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            },
        }
    }
}

/// Errors raised while parsing core values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown target type: {0}")]
    UnknownTargetType(String),
}

impl CoreError {
    pub fn unknown_target_type(target_type: impl Into<String>) -> Self {
        Self::UnknownTargetType(target_type.into())
    }
}
