//! Seen-record CRUD routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use database::models::{NewSeenRecord, SeenRecord, SeenRecordPatch};
use database::page::{Page, PageInfo};
use database::seen_record::{self, CreateOutcome, SeenRecordFilter};
use database::validation::is_valid_record_id;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Query parameters accepted by the list endpoint.
///
/// Pagination values arrive as raw strings and are clamped into a [`Page`];
/// anything that is not a positive integer falls back to the defaults.
#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub active: Option<String>,
}

/// A page of records plus pagination metadata.
#[derive(Serialize)]
pub struct ListResponse {
    pub data: Vec<SeenRecord>,
    pub pagination: PageInfo,
}

/// Body accepted by the create endpoint.
#[derive(Deserialize)]
pub struct CreateRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub message_ids: Vec<String>,
}

/// Confirmation body returned by the delete endpoint.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// List seen records with optional filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let page = Page::from_raw(query.page.as_deref(), query.limit.as_deref());
    // Empty filter values are treated as absent, not as "must be empty".
    let filter = SeenRecordFilter {
        user_id: query.user_id.filter(|v| !v.is_empty()),
        username: query.username.filter(|v| !v.is_empty()),
        active: query.active.map(|v| v == "true"),
    };

    let (data, pagination) = seen_record::list(state.db.pool(), &filter, &page).await?;

    Ok(Json(ListResponse { data, pagination }))
}

/// Get a single seen record by id.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SeenRecord>> {
    if !is_valid_record_id(&id) {
        return Err(ApiError::InvalidId);
    }

    let record = seen_record::get(state.db.pool(), &id).await?;

    Ok(Json(record))
}

/// Record message ids as seen by a user.
///
/// Returns 201 when a record was created for a first-time user, 200 when an
/// existing record absorbed the submitted ids.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<SeenRecord>)> {
    let user_id = req
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingUserId)?;

    let new = NewSeenRecord {
        user_id,
        username: req.username,
        message_ids: req.message_ids,
    };

    match seen_record::create_or_merge(state.db.pool(), &new).await? {
        CreateOutcome::Created(record) => {
            info!(user_id = %record.user_id, "Seen record created");
            Ok((StatusCode::CREATED, Json(record)))
        }
        CreateOutcome::Merged(record) => Ok((StatusCode::OK, Json(record))),
    }
}

/// Apply a partial update to a seen record.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SeenRecordPatch>,
) -> Result<Json<SeenRecord>> {
    if !is_valid_record_id(&id) {
        return Err(ApiError::InvalidId);
    }

    let record = seen_record::update(state.db.pool(), &id, &patch).await?;

    Ok(Json(record))
}

/// Delete a seen record.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !is_valid_record_id(&id) {
        return Err(ApiError::InvalidId);
    }

    seen_record::delete(state.db.pool(), &id).await?;

    Ok(Json(DeleteResponse {
        message: "Seen record deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Database;

    async fn test_state() -> AppState {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        AppState::new(db)
    }

    fn create_request(user_id: Option<&str>, message_ids: &[&str]) -> CreateRequest {
        CreateRequest {
            user_id: user_id.map(|u| u.to_string()),
            username: None,
            message_ids: message_ids.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let state = test_state().await;

        let result = create(State(state.clone()), Json(create_request(None, &["m-1"]))).await;
        assert!(matches!(result, Err(ApiError::MissingUserId)));

        // An empty user_id is as good as a missing one.
        let result = create(State(state), Json(create_request(Some(""), &["m-1"]))).await;
        assert!(matches!(result, Err(ApiError::MissingUserId)));
    }

    #[tokio::test]
    async fn test_create_reports_created_then_merged() {
        let state = test_state().await;

        let (status, _) = create(
            State(state.clone()),
            Json(create_request(Some("u-1"), &["m-1"])),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let (status, Json(record)) = create(
            State(state),
            Json(create_request(Some("u-1"), &["m-1", "m-2"])),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record.message_ids.0, ["m-1", "m-2"]);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected_before_the_store() {
        let state = test_state().await;

        let result = get_by_id(State(state.clone()), Path("not-a-uuid".to_string())).await;
        assert!(matches!(result, Err(ApiError::InvalidId)));

        let result = update(
            State(state.clone()),
            Path("not-a-uuid".to_string()),
            Json(SeenRecordPatch::default()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::InvalidId)));

        let result = delete(State(state), Path("not-a-uuid".to_string())).await;
        assert!(matches!(result, Err(ApiError::InvalidId)));
    }

    #[tokio::test]
    async fn test_well_formed_missing_id_is_not_found() {
        let state = test_state().await;

        let result = get_by_id(
            State(state),
            Path("c27fb365-0c84-4cf2-8555-814bb065e448".to_string()),
        )
        .await;
        assert!(matches!(
            result,
            Err(ApiError::Database(
                database::DatabaseError::NotFound { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_list_clamps_pagination_input() {
        let state = test_state().await;
        create(
            State(state.clone()),
            Json(create_request(Some("u-1"), &["m-1"])),
        )
        .await
        .unwrap();

        let query = ListQuery {
            page: Some("zero".to_string()),
            limit: Some("-3".to_string()),
            user_id: None,
            username: None,
            active: None,
        };
        let Json(response) = list(State(state), Query(query)).await.unwrap();
        assert_eq!(response.pagination.page, 1);
        assert_eq!(response.pagination.limit, 100);
        assert_eq!(response.data.len(), 1);
    }
}
