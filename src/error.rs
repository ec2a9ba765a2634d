use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum LambError {
    /// A non-positive (or NaN) input parameter
    Domain { parameter: &'static str, value: f64 },
    Input(String),
}

impl Display for LambError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LambError::Domain { parameter, value } => {
                write!(f, "Domain error: {parameter} must be positive, got {value}")
            }
            LambError::Input(v) => write!(f, "Input error: {v}"),
        }
    }
}

impl std::error::Error for LambError {}

impl LambError {
    /// Name of the offending parameter for domain errors
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            LambError::Domain { parameter, .. } => Some(parameter),
            LambError::Input(_) => None,
        }
    }
}
