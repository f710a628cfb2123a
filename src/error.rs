use thiserror::Error;

/// What kind of structure a lookup was searching for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Response,
    Array,
    NumericObject,
    NamedObject,
    DotPath,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Target::Response => "response",
            Target::Array => "array",
            Target::NumericObject => "numeric-keyed object",
            Target::NamedObject => "object",
            Target::DotPath => "path",
        };
        f.write_str(label)
    }
}

/// Failures raised while inspecting a captured JSON document.
///
/// Every variant is recoverable: callers are expected to report it and ask
/// for a different selection.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("{target} '{name}' not found")]
    NotFound { target: Target, name: String },

    #[error("selection '{name}' is not in the {target} catalog")]
    MalformedSelection { target: Target, name: String },

    #[error("input is {size} bytes, limit is {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    #[error("document nesting exceeds the depth limit of {max_depth}")]
    TooDeep { max_depth: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("target url is empty")]
    EmptyUrl,
}

impl ShapeError {
    pub(crate) fn not_found(target: Target, name: impl Into<String>) -> Self {
        ShapeError::NotFound {
            target,
            name: name.into(),
        }
    }

    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        ShapeError::StructuralMismatch(msg.into())
    }

    /// A stale selection and a missing structure are reported the same way.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ShapeError::NotFound { .. } | ShapeError::MalformedSelection { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;
