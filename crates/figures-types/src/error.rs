#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Invalid century bands: {0}")]
    InvalidBands(String),
}

impl ParseError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        ParseError::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}
