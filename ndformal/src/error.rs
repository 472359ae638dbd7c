use thiserror::Error;

/// Errors raised by the matcher, the substitution engine and the node constructors.
///
/// Failing to match a law is *not* an error: matchers report it as `None`. These
/// variants describe rule catalogs or inputs the engine cannot handle at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("Unsupported construct in law '{law}': {construct}")]
    UnsupportedConstruct { construct: String, law: String },

    #[error("Substituting '{variable}' would capture a bound variable in '{within}'")]
    VariableCapture { variable: String, within: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("'{symbol}' expects {expected} argument(s), got {found}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },
}

impl LogicError {
    /// Build an [`LogicError::UnsupportedConstruct`] not yet attributed to a law.
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        LogicError::UnsupportedConstruct {
            construct: construct.into(),
            law: String::new(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        LogicError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attach the name of the law being evaluated, if none was recorded yet.
    pub fn in_law(self, name: &str) -> Self {
        match self {
            LogicError::UnsupportedConstruct { construct, law } if law.is_empty() => {
                LogicError::UnsupportedConstruct {
                    construct,
                    law: name.to_string(),
                }
            }
            other => other,
        }
    }

    /// Whether this error is one of the "unsupported" family (scoped to a single law).
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            LogicError::UnsupportedConstruct { .. } | LogicError::VariableCapture { .. }
        )
    }
}

pub type LogicResult<T> = Result<T, LogicError>;
