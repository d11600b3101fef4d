use crate::endpoints::server::AppState;
use crate::error::{BundleError, too_large_message};
use crate::map::render_index;
use crate::models::bundle::{ErrorResponse, ShareResponse, TooLargeResponse};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;

pub async fn webmap_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_index(state.max_payload_bytes))
}

pub async fn share_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(limit = state.max_payload_bytes, "share payload too large");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(TooLargeResponse {
                    message: too_large_message(state.max_payload_bytes),
                    limit_bytes: state.max_payload_bytes,
                }),
            )
                .into_response();
        }
        Err(rejection) => {
            return bundle_error(BundleError::InvalidPayload(rejection.body_text()));
        }
    };

    match state.service.create_bundle(body).await {
        Ok(id) => (StatusCode::OK, Json(ShareResponse { id })).into_response(),
        Err(e) => bundle_error(e),
    }
}

pub async fn view_handler(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.service.get_bundle(&id).await {
        Ok(bundle) => (StatusCode::OK, Json(bundle.as_ref())).into_response(),
        Err(e) => bundle_error(e),
    }
}

fn bundle_error(err: BundleError) -> Response {
    let status = match err {
        BundleError::InvalidPayload(ref reason) => {
            tracing::warn!(%reason, "share request rejected");
            StatusCode::BAD_REQUEST
        }
        BundleError::NotFound => StatusCode::NOT_FOUND,
    };
    let error = err.to_string();
    (status, Json(ErrorResponse { error })).into_response()
}
