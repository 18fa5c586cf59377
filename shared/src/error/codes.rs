//! Unified error codes for the order weight editor
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order edit errors
//! - 8xxx: Upstream (commerce platform) errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Order edit ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Operator edit is invalid (negative weight, bad price)
    InvalidLineItemEdit = 4003,
    /// Another edit session for the same order is running
    EditInProgress = 4004,
    /// The platform refused to open an edit session
    CannotEditOrder = 4010,
    /// A mutation inside the edit session failed
    EditApplicationFailed = 4011,
    /// The edit session could not be committed
    CommitFailed = 4012,

    // ==================== 8xxx: Upstream ====================
    /// Commerce platform returned an error
    UpstreamError = 8001,
    /// Commerce platform returned a malformed payload
    UpstreamInvalidResponse = 8002,

    // ==================== 9xxx: System ====================
    /// Network error
    NetworkError = 9003,
    /// Operation timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            // Order edit
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidLineItemEdit => "Invalid line item edit",
            ErrorCode::EditInProgress => "Order is already being edited",
            ErrorCode::CannotEditOrder => "Order cannot be edited",
            ErrorCode::EditApplicationFailed => "Failed to apply order edit",
            ErrorCode::CommitFailed => "Failed to commit order edit",

            // Upstream
            ErrorCode::UpstreamError => "Commerce platform error",
            ErrorCode::UpstreamInvalidResponse => "Commerce platform returned an invalid response",

            // System
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),

            // Order edit
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::InvalidLineItemEdit),
            4004 => Ok(ErrorCode::EditInProgress),
            4010 => Ok(ErrorCode::CannotEditOrder),
            4011 => Ok(ErrorCode::EditApplicationFailed),
            4012 => Ok(ErrorCode::CommitFailed),

            // Upstream
            8001 => Ok(ErrorCode::UpstreamError),
            8002 => Ok(ErrorCode::UpstreamInvalidResponse),

            // System
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
