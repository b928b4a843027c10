use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleError {
    /// Caller broke an engine precondition (seat range, vector length, winner == discarder, ...)
    PreconditionViolation { message: String },
    /// A transfer would push a balance outside the `i32` range
    Overflow { message: String },
    /// A settlement rule failed to parse or validate
    Config { message: String },
}

impl SettleError {
    pub fn precondition(message: impl Into<String>) -> Self {
        SettleError::PreconditionViolation {
            message: message.into(),
        }
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        SettleError::Overflow {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SettleError::Config {
            message: message.into(),
        }
    }
}

impl fmt::Display for SettleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettleError::PreconditionViolation { message } => {
                write!(f, "Precondition violation: {}", message)
            }
            SettleError::Overflow { message } => {
                write!(f, "Score overflow: {}", message)
            }
            SettleError::Config { message } => {
                write!(f, "Invalid settlement rule: {}", message)
            }
        }
    }
}

impl std::error::Error for SettleError {}

impl From<serde_json::Error> for SettleError {
    fn from(err: serde_json::Error) -> Self {
        SettleError::config(err.to_string())
    }
}

pub type SettleResult<T> = Result<T, SettleError>;

#[cfg(feature = "python")]
impl From<SettleError> for pyo3::PyErr {
    fn from(err: SettleError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
