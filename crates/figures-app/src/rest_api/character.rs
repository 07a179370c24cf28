use figures_dal::character::{Character, CharacterRepository, CreateCharacter, UpdateCharacter};
use serde::Serialize;

use crate::events::{EventMessage, EventType};
use crate::state::AppState;
use axum::routing::{get, post};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Satisfaction {
    pub id: String,
    pub likes: u32,
    pub satisfaction: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LikesNotice<'a> {
    id: &'a str,
    likes: u32,
}

fn saved(state: &AppState, record: &Character) {
    state.events().send(EventMessage::new(
        &record.id,
        EventType::CharacterSaved,
        record,
    ));
}

fn likes_changed(state: &AppState, record: &Character) {
    state.events().send(EventMessage::new(
        &record.id,
        EventType::LikesChanged,
        LikesNotice {
            id: &record.id,
            likes: record.likes,
        },
    ));
}

mod crud_api {
    use super::*;
    use crate::error::ApiResult;
    use crate::rest_api::{Page, Paging};
    use crate::validate::Garde;
    use axum::{
        extract::{Path, Query, State},
        response::IntoResponse,
        Json,
    };
    use figures_dal::stats::satisfaction as satisfaction_level;
    use figures_types::{FieldOfActivity, Status};
    use http::StatusCode;
    use tracing::{debug, info};

    pub async fn list(
        repository: CharacterRepository,
        Garde(Query(paging)): Garde<Query<Paging>>,
        State(state): State<AppState>,
    ) -> ApiResult<impl IntoResponse> {
        debug!("Paging: {:?}", paging);
        let default_page_size = state.config().default_page_size;
        let page_size = paging.page_size(default_page_size);
        let listing_params = paging.into_listing_params(default_page_size)?;
        let batch = repository.list(listing_params).await?;
        Ok((StatusCode::OK, Json(Page::from_batch(batch, page_size))))
    }

    pub async fn list_all(repository: CharacterRepository) -> ApiResult<impl IntoResponse> {
        let records = repository.list_all().await;
        Ok((StatusCode::OK, Json(records)))
    }

    pub async fn count(repository: CharacterRepository) -> ApiResult<impl IntoResponse> {
        let count = repository.count().await;
        Ok((StatusCode::OK, Json(count)))
    }

    pub async fn get(
        Path(id): Path<String>,
        repository: CharacterRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(&id).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn satisfaction(
        Path(id): Path<String>,
        repository: CharacterRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(&id).await?;
        let body = Satisfaction {
            satisfaction: satisfaction_level(record.likes),
            likes: record.likes,
            id: record.id,
        };
        Ok((StatusCode::OK, Json(body)))
    }

    pub async fn by_field(
        Path(field): Path<String>,
        repository: CharacterRepository,
    ) -> ApiResult<impl IntoResponse> {
        let field: FieldOfActivity = field.parse()?;
        let records = repository.list_by_field(field).await;
        Ok((StatusCode::OK, Json(records)))
    }

    pub async fn by_status(
        Path(status): Path<String>,
        repository: CharacterRepository,
    ) -> ApiResult<impl IntoResponse> {
        let status: Status = status.parse()?;
        let records = repository.list_by_status(status).await;
        Ok((StatusCode::OK, Json(records)))
    }

    pub async fn create(
        repository: CharacterRepository,
        State(state): State<AppState>,
        Garde(Json(payload)): Garde<Json<CreateCharacter>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;
        info!("Created character {} ({})", record.name, record.id);
        saved(&state, &record);

        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn update(
        Path(id): Path<String>,
        repository: CharacterRepository,
        State(state): State<AppState>,
        Garde(Json(payload)): Garde<Json<UpdateCharacter>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.update(&id, payload).await?;
        saved(&state, &record);

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn like(
        Path(id): Path<String>,
        repository: CharacterRepository,
        State(state): State<AppState>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.like(&id).await?;
        likes_changed(&state, &record);

        Ok((StatusCode::OK, Json(record)))
    }

    pub async fn unlike(
        Path(id): Path<String>,
        repository: CharacterRepository,
        State(state): State<AppState>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.unlike(&id).await?;
        likes_changed(&state, &record);

        Ok((StatusCode::OK, Json(record)))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route("/all", get(crud_api::list_all))
        .route("/count", get(crud_api::count))
        .route("/by-field/{field}", get(crud_api::by_field))
        .route("/by-status/{status}", get(crud_api::by_status))
        .route("/{id}", get(crud_api::get).put(crud_api::update))
        .route("/{id}/satisfaction", get(crud_api::satisfaction))
        .route("/{id}/like", post(crud_api::like).delete(crud_api::unlike))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use axum::body::{to_bytes, Body};
    use http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (AppState, axum::Router) {
        let state = AppState::new(AppConfig::default(), CharacterRepository::with_seed());
        let router = router().with_state(state.clone());
        (state, router)
    }

    async fn call(router: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_list_page() {
        let (_, router) = app();
        let (status, page) = call(router.clone(), "GET", "/?sort=-likes&page_size=2&page=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total_pages"], 3);
        assert_eq!(page["rows"][0]["likes"], 189);
        assert_eq!(page["rows"][1]["likes"], 167);

        let (status, body) = call(router, "GET", "/?sort=works,likes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("one sort column"));
    }

    #[tokio::test]
    async fn test_like_publishes_event() {
        let (state, router) = app();
        let mut events = state.events().subscribe();
        let (status, record) = call(router.clone(), "POST", "/5/like").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["likes"], 168);

        let message = events.recv().await.unwrap();
        assert_eq!(message.kind(), EventType::LikesChanged);
        assert_eq!(message.id(), "5");
        assert_eq!(message.data(), r#"{"id":"5","likes":168}"#);

        let (status, _) = call(router, "DELETE", "/nobody/like").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
