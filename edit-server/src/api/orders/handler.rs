//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use shared::order::{EditDelta, EditOutcome, LineItemEdit};

use crate::core::ServerState;
use crate::reconcile::OrderView;
use crate::utils::{ApiResponse, AppError, AppResult};

/// Operator edits for one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub edits: Vec<LineItemEdit>,
}

impl EditRequest {
    /// Unwrap the JSON body, reporting a malformed one in the API envelope
    fn from_body(body: Result<Json<EditRequest>, JsonRejection>) -> AppResult<Self> {
        body.map(|Json(request)| request)
            .map_err(|rejection| AppError::invalid_request(rejection.body_text()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub outcome: EditOutcome,
    /// Where the operator goes after submitting
    pub admin_url: String,
}

/// Get the edit view of an order
pub async fn get_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<ApiResponse<OrderView>> {
    let view = state.service.view(&order_id).await?;
    Ok(ApiResponse::success(view))
}

/// Preview the deltas of an edit
pub async fn preview(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    body: Result<Json<EditRequest>, JsonRejection>,
) -> AppResult<ApiResponse<Vec<EditDelta>>> {
    let request = EditRequest::from_body(body)?;
    let deltas = state.service.preview(&order_id, &request.edits).await?;
    Ok(ApiResponse::success(deltas))
}

/// Apply an edit
pub async fn submit(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    body: Result<Json<EditRequest>, JsonRejection>,
) -> AppResult<ApiResponse<EditResponse>> {
    let request = EditRequest::from_body(body)?;
    let outcome = state.service.submit(&order_id, &request.edits).await?;
    let message = match &outcome {
        EditOutcome::NoChanges => "No changes detected",
        EditOutcome::Committed { .. } => "Order updated",
    };
    Ok(ApiResponse::success_with_message(
        message,
        EditResponse {
            outcome,
            admin_url: state.order_admin_url(&order_id),
        },
    ))
}
