//! Index page
//!
//! `GET /` answers with every publication ranked by likes, most liked first.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::PublicationWithLikes;

/// Response for the index page
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub publications: Vec<PublicationWithLikes>,
}

/// GET / - Publications ranked by likes
pub async fn index(State(state): State<AppState>) -> Result<Json<IndexResponse>, ApiError> {
    let publications = state.ranking_service.rank_publications_by_likes().await?;
    Ok(Json(IndexResponse { publications }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{create_publication, create_user, test_server};
    use serde_json::{json, Value};

    async fn like(server: &axum_test::TestServer, author: i64, target: Value) {
        server
            .post("/api/v1/likes")
            .json(&json!({ "author_id": author, "target": target }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_index_ranks_publications() {
        let (server, _pool) = test_server().await;
        let writer = create_user(&server, "writer").await;
        let fan = create_user(&server, "fan").await;
        let quiet = create_publication(&server, writer, "quiet").await;
        let loved = create_publication(&server, writer, "loved").await;

        like(&server, writer, json!({ "type": "publication", "id": loved })).await;
        like(&server, fan, json!({ "type": "publication", "id": loved })).await;

        let body: Value = server.get("/").await.json();
        let ranked = body["publications"].as_array().unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0]["id"], loved);
        assert_eq!(ranked[0]["like_count"], 2);
        assert_eq!(ranked[1]["id"], quiet);
        assert_eq!(ranked[1]["like_count"], 0);
    }

    #[tokio::test]
    async fn test_popular_comments() {
        let (server, _pool) = test_server().await;
        let writer = create_user(&server, "writer").await;
        let post = create_publication(&server, writer, "post").await;
        let mut ids = Vec::new();
        for text in ["meh", "great"] {
            let comment: Value = server
                .post(&format!("/api/v1/publications/{}/comments", post))
                .json(&json!({ "author_id": writer, "comment": text }))
                .await
                .json();
            ids.push(comment["id"].clone());
        }
        like(&server, writer, json!({ "type": "comment", "id": ids[1] })).await;

        let ranked: Value = server
            .get(&format!("/api/v1/publications/{}/comments/popular", post))
            .await
            .json();
        assert_eq!(ranked[0]["comment"], "great");
        assert_eq!(ranked[0]["like_count"], 1);
        assert_eq!(ranked[1]["comment"], "meh");
        assert_eq!(ranked[1]["like_count"], 0);
    }
}
