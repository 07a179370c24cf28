pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid order by field: {0}")]
    InvalidOrderByField(String),

    #[error("Work already listed: {0}")]
    DuplicateWork(String),

    #[error("Work title is empty")]
    EmptyWork,

    #[error("Duplicate character id: {0}")]
    DuplicateId(String),

    #[error("Invalid character {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Invalid value: {0}")]
    InvalidValue(#[from] figures_types::ParseError),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(#[from] serde_json::Error),
}
