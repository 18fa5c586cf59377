//! Reconciliation errors and local anomalies

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::order::AdjustmentKind;
use shop_client::ClientError;
use thiserror::Error;

/// Fatal errors of the reconciliation engine
///
/// The three session errors keep the phase that failed so the caller can
/// tell the operator which step went wrong. None of them are retried.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Failed to load order {order_id}: {source}")]
    Query {
        order_id: String,
        source: ClientError,
    },

    #[error("Invalid edit for line item {line_item_id}: {reason}")]
    InvalidEdit {
        line_item_id: String,
        reason: String,
    },

    #[error("Order {0} is already being edited")]
    EditInProgress(String),

    #[error("Order {order_id} cannot be edited: {source}")]
    CannotEditOrder {
        order_id: String,
        source: ClientError,
    },

    #[error("Failed to apply edit to line item {line_item_id}: {source}")]
    EditApplicationFailed {
        line_item_id: String,
        source: ClientError,
    },

    #[error("Failed to commit edit session {calculated_order_id}: {source}")]
    CommitFailed {
        calculated_order_id: String,
        source: ClientError,
    },
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;

impl ReconcileError {
    /// Session phase for the fatal edit-session errors
    pub fn phase(&self) -> Option<&'static str> {
        match self {
            ReconcileError::CannotEditOrder { .. } => Some("begin"),
            ReconcileError::EditApplicationFailed { .. } => Some("apply"),
            ReconcileError::CommitFailed { .. } => Some("commit"),
            _ => None,
        }
    }

    fn client_error(&self) -> Option<&ClientError> {
        match self {
            ReconcileError::Query { source, .. }
            | ReconcileError::CannotEditOrder { source, .. }
            | ReconcileError::EditApplicationFailed { source, .. }
            | ReconcileError::CommitFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        let code = match &err {
            ReconcileError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            ReconcileError::Query { source, .. } => match source {
                ClientError::Timeout(_) => ErrorCode::TimeoutError,
                ClientError::Http(_) => ErrorCode::NetworkError,
                ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                    ErrorCode::UpstreamInvalidResponse
                }
                _ => ErrorCode::UpstreamError,
            },
            ReconcileError::InvalidEdit { .. } => ErrorCode::InvalidLineItemEdit,
            ReconcileError::EditInProgress(_) => ErrorCode::EditInProgress,
            ReconcileError::CannotEditOrder { .. } => ErrorCode::CannotEditOrder,
            ReconcileError::EditApplicationFailed { .. } => ErrorCode::EditApplicationFailed,
            ReconcileError::CommitFailed { .. } => ErrorCode::CommitFailed,
        };

        let mut app_err = AppError::with_message(code, err.to_string());

        if let Some(phase) = err.phase() {
            app_err = app_err.with_detail("phase", phase);
        }
        match &err {
            ReconcileError::InvalidEdit { line_item_id, .. }
            | ReconcileError::EditApplicationFailed { line_item_id, .. } => {
                app_err = app_err.with_detail("line_item_id", line_item_id.as_str());
            }
            _ => {}
        }
        if let Some(user_errors) = err.client_error().and_then(ClientError::user_errors) {
            app_err = app_err.with_detail(
                "user_errors",
                serde_json::to_value(user_errors).unwrap_or_default(),
            );
        }

        app_err
    }
}

/// Non-fatal data-quality problem found while building the edit view
///
/// Anomalies are logged and returned with the view; the engine recovers
/// with a documented default.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "anomaly", rename_all = "snake_case")]
pub enum Anomaly {
    /// Weight below 0.01 lb or out of range; 1 lb per unit was assumed
    InvalidWeight {
        line_item_id: String,
        /// `None` when the weight did not fit in a decimal
        weight: Option<Decimal>,
    },
    /// Adjustment text could not be fully decoded
    DecodeAnomaly {
        source_id: String,
        text: String,
        reason: String,
    },
    /// Marked discount whose value is not a fixed amount
    UnsupportedDiscountValue {
        line_item_id: String,
        text: String,
    },
    /// Several records of the same kind reference one line item
    DuplicateAdjustment {
        line_item_id: String,
        kind: AdjustmentKind,
    },
}

impl Anomaly {
    pub fn log(&self) {
        tracing::warn!(anomaly = %self, "Order data anomaly");
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::InvalidWeight {
                line_item_id,
                weight,
            } => match weight {
                Some(weight) => write!(
                    f,
                    "invalid weight {} for line item {}, assuming 1 lb per unit",
                    weight, line_item_id
                ),
                None => write!(
                    f,
                    "out of range weight for line item {}, assuming 1 lb per unit",
                    line_item_id
                ),
            },
            Anomaly::DecodeAnomaly {
                source_id, reason, ..
            } => write!(f, "cannot decode adjustment {}: {}", source_id, reason),
            Anomaly::UnsupportedDiscountValue { line_item_id, .. } => write!(
                f,
                "discount for line item {} is not a fixed amount, ignored",
                line_item_id
            ),
            Anomaly::DuplicateAdjustment { line_item_id, kind } => write!(
                f,
                "duplicate {:?} record for line item {}, keeping the latest",
                kind, line_item_id
            ),
        }
    }
}
