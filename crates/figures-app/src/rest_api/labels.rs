use axum::{extract::Path, response::IntoResponse, routing::get, Json};
use figures_types::{labels::LabelTable, Locale};
use http::StatusCode;

use crate::{error::ApiResult, state::AppState};

async fn labels(Path(locale): Path<String>) -> ApiResult<impl IntoResponse> {
    let locale: Locale = locale.parse()?;
    Ok((StatusCode::OK, Json(LabelTable::new(locale))))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/{locale}", get(labels))
}
