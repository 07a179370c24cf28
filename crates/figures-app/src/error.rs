use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use tracing::{debug, error};

use crate::draft::DraftError;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unprocessable request: {0}")]
    UnprocessableRequest(String),
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] garde::Report),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<figures_dal::Error> for ApiError {
    fn from(e: figures_dal::Error) -> Self {
        use figures_dal::Error;
        match e {
            Error::RecordNotFound(what) => ApiError::ResourceNotFound(what),
            Error::InvalidOrderByField(field) => {
                ApiError::InvalidQuery(format!("Cannot sort by {field}"))
            }
            Error::InvalidValue(e) => ApiError::InvalidQuery(e.to_string()),
            e @ Error::DuplicateWork(_) => ApiError::Conflict(e.to_string()),
            e @ Error::EmptyWork => ApiError::UnprocessableRequest(e.to_string()),
            e @ (Error::DuplicateId(_)
            | Error::InvalidRecord { .. }
            | Error::InvalidSeed(_)) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<DraftError> for ApiError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::DraftNotFound(_) | DraftError::FileNotFound(_) => {
                ApiError::ResourceNotFound(e.to_string())
            }
            DraftError::Catalogue(e) => e.into(),
        }
    }
}

impl From<figures_types::ParseError> for ApiError {
    fn from(e: figures_types::ParseError) -> Self {
        ApiError::InvalidQuery(e.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::InvalidRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::InvalidQuery(e.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        match e {
            JsonRejection::JsonDataError(e) => ApiError::UnprocessableRequest(e.body_text()),
            e => ApiError::InvalidRequest(e.body_text()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableRequest(_) | ApiError::ValidationFailed(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected: {self}");
        }
        let body = match &self {
            ApiError::ValidationFailed(report) => {
                let fields: serde_json::Map<String, serde_json::Value> = report
                    .iter()
                    .map(|(path, e)| (path.to_string(), e.message().into()))
                    .collect();
                json!({"error": self.to_string(), "fields": fields})
            }
            _ => json!({"error": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}
