//! Feedback handlers: submission, listing, archive browsing, deletion, export
//! and the sentiment summary.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use fbdb_archive::{FilterCriteria, SentimentSummary};
use fbdb_core::{AdminContext, Category, FeedbackRecord, Submission};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_archive_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CategoryItem {
    label: &'static str,
}

/// GET /api/v1/categories
pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryItem>>> {
    let data = state
        .archive
        .categories()
        .iter()
        .map(|c: &Category| CategoryItem { label: c.label() })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// POST /api/v1/feedback
pub(super) async fn submit_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<Submission>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackRecord>>), ApiError> {
    let record = state
        .archive
        .submit(body)
        .await
        .map_err(|e| map_archive_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: record,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/feedback
pub(super) async fn list_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<FeedbackRecord>>>, ApiError> {
    let data = state
        .archive
        .list_all()
        .await
        .map_err(|e| map_archive_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/feedback/archive
pub(super) async fn browse_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<ApiResponse<Vec<FeedbackRecord>>>, ApiError> {
    let data = state
        .archive
        .browse(&criteria)
        .await
        .map_err(|e| map_archive_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/feedback/{id}
pub(super) async fn delete_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(admin): Extension<AdminContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .archive
        .delete(&admin, id)
        .await
        .map_err(|e| map_archive_error(req_id.0, &e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/feedback/export/{format}
pub(super) async fn export_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(admin): Extension<AdminContext>,
    Path(format): Path<String>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Response, ApiError> {
    let file = state
        .archive
        .export(&admin, &criteria, &format)
        .await
        .map_err(|e| map_archive_error(req_id.0, &e))?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    let mut res = file.bytes.into_response();
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(file.content_type),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(res)
}

/// GET /api/v1/feedback/summary
pub(super) async fn feedback_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(admin): Extension<AdminContext>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<ApiResponse<SentimentSummary>>, ApiError> {
    let data = state
        .archive
        .summary(&admin, &criteria)
        .await
        .map_err(|e| map_archive_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
