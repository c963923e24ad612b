//! Tag API endpoints
//!
//! Handles HTTP requests for tag management:
//! - GET /api/v1/tags - Tag list ordered by title
//! - POST /api/v1/tags - Create a tag
//! - GET/PUT/DELETE /api/v1/tags/{id}
//! - GET /api/v1/tags/{id}/publications - Publications carrying the tag

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::publications::PublicationListResponse;
use crate::models::{Tag, TagInput};

/// Response for tag list
#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<Tag>,
}

/// Build the tags router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{id}", get(get_tag).put(update_tag).delete(delete_tag))
        .route("/{id}/publications", get(get_tag_publications))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<TagListResponse>, ApiError> {
    let tags = state.tag_service.list().await?;
    Ok(Json(TagListResponse { tags }))
}

async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<TagInput>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state.tag_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.tag_service.get(id).await?))
}

async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TagInput>,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.tag_service.update(id, input).await?))
}

async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.tag_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_tag_publications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PublicationListResponse>, ApiError> {
    let publications = state.tag_service.publications_of(id).await?;
    Ok(Json(PublicationListResponse { publications }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{create_publication, create_user, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_tag_crud() {
        let (server, _pool) = test_server().await;

        let created: Value = server
            .post("/api/v1/tags")
            .json(&json!({ "title": "  food " }))
            .await
            .json();
        assert_eq!(created["title"], "food");
        let path = format!("/api/v1/tags/{}", created["id"]);

        let untitled: Value = server.post("/api/v1/tags").json(&json!({})).await.json();
        assert_eq!(untitled["title"], Value::Null);

        let renamed: Value = server
            .put(&path)
            .json(&json!({ "title": "cooking" }))
            .await
            .json();
        assert_eq!(renamed["title"], "cooking");

        let list: Value = server.get("/api/v1/tags").await.json();
        assert_eq!(list["tags"].as_array().unwrap().len(), 2);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tag_publications() {
        let (server, _pool) = test_server().await;
        let author = create_user(&server, "writer").await;
        let post = create_publication(&server, author, "trip").await;
        let tag: Value = server
            .post("/api/v1/tags")
            .json(&json!({ "title": "travel" }))
            .await
            .json();

        server
            .put(&format!("/api/v1/publications/{}/tags/{}", post, tag["id"]))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let body: Value = server
            .get(&format!("/api/v1/tags/{}/publications", tag["id"]))
            .await
            .json();
        assert_eq!(body["publications"][0]["id"], post);

        server
            .get("/api/v1/tags/999/publications")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
