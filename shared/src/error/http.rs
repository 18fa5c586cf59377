//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::EditInProgress => StatusCode::CONFLICT,

            // 422 Unprocessable: the platform refused the edit
            Self::CannotEditOrder | Self::EditApplicationFailed | Self::CommitFailed => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 502 Bad Gateway
            Self::UpstreamError | Self::UpstreamInvalidResponse => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable (transient errors)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 400 Bad Request
            Self::InvalidRequest | Self::InvalidLineItemEdit => StatusCode::BAD_REQUEST,
        }
    }
}
