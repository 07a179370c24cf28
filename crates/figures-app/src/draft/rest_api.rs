use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use figures_dal::character::{CharacterFields, CharacterRepository};
use figures_types::ResourceKind;
use garde::Validate;
use http::StatusCode;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{Drafts, FileBatch};
use crate::{
    error::ApiResult,
    events::{EventMessage, EventType},
    state::AppState,
    validate::Garde,
};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OpenDraft {
    #[serde(default)]
    #[garde(inner(length(min = 1, max = 64)))]
    pub character_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkTitle {
    #[garde(length(max = 255))]
    pub title: String,
}

async fn open(
    drafts: Drafts,
    repository: CharacterRepository,
    Garde(Json(request)): Garde<Json<OpenDraft>>,
) -> ApiResult<impl IntoResponse> {
    let character = match request.character_id {
        Some(id) => Some(repository.get(&id).await?),
        None => None,
    };
    let view = drafts.open(character.as_ref()).await;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_draft(Path(id): Path<Uuid>, drafts: Drafts) -> ApiResult<impl IntoResponse> {
    let view = drafts.get(id).await?;
    Ok((StatusCode::OK, Json(view)))
}

async fn discard(Path(id): Path<Uuid>, drafts: Drafts) -> ApiResult<impl IntoResponse> {
    drafts.discard(id).await?;
    Ok((StatusCode::NO_CONTENT, ()))
}

async fn add_work(
    Path(id): Path<Uuid>,
    drafts: Drafts,
    Garde(Json(work)): Garde<Json<WorkTitle>>,
) -> ApiResult<impl IntoResponse> {
    let view = drafts.add_work(id, &work.title).await?;
    Ok((StatusCode::OK, Json(view)))
}

async fn remove_work(
    Path((id, title)): Path<(Uuid, String)>,
    drafts: Drafts,
) -> ApiResult<impl IntoResponse> {
    let view = drafts.remove_work(id, &title).await?;
    Ok((StatusCode::OK, Json(view)))
}

async fn add_files(
    Path((id, kind)): Path<(Uuid, String)>,
    drafts: Drafts,
    Garde(Json(FileBatch(files))): Garde<Json<FileBatch>>,
) -> ApiResult<impl IntoResponse> {
    let kind: ResourceKind = kind.parse()?;
    let outcome = drafts.add_files(id, kind, files).await?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}

async fn remove_file(
    Path((id, kind, file_id)): Path<(Uuid, String, Uuid)>,
    drafts: Drafts,
) -> ApiResult<impl IntoResponse> {
    let kind: ResourceKind = kind.parse()?;
    let view = drafts.remove_file(id, kind, file_id).await?;
    Ok((StatusCode::OK, Json(view)))
}

/// Saves the form. Uploads still running are left out of the saved resources.
async fn submit(
    Path(id): Path<Uuid>,
    drafts: Drafts,
    repository: CharacterRepository,
    State(state): State<AppState>,
    Garde(Json(fields)): Garde<Json<CharacterFields>>,
) -> ApiResult<impl IntoResponse> {
    let submission = drafts.submission(id).await?;
    let payload = fields.into_payload(
        submission.works,
        submission.text_resources,
        submission.audio_resources,
    );
    payload.validate()?;

    let (status, record) = match submission.character_id {
        Some(character_id) => (
            StatusCode::OK,
            repository.update(&character_id, payload).await?,
        ),
        None => (StatusCode::CREATED, repository.create(payload).await?),
    };
    drafts.close(id).await;
    info!("Saved character {} from draft {id}", record.id);
    state.events().send(EventMessage::new(
        &record.id,
        EventType::CharacterSaved,
        &record,
    ));
    Ok((status, Json(record)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open))
        .route("/{id}", get(get_draft).delete(discard))
        .route("/{id}/works", post(add_work))
        .route("/{id}/works/{title}", delete(remove_work))
        .route("/{id}/files/{kind}", post(add_files))
        .route("/{id}/files/{kind}/{file_id}", delete(remove_file))
        .route("/{id}/submit", post(submit))
}
