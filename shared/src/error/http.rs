//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound | Self::ProductNotFound | Self::AssetNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::SignatureInvalid | Self::SignatureExpired => StatusCode::UNAUTHORIZED,

            // 500 Internal Server Error (upstream failures surface as server errors)
            Self::UpstreamError | Self::UpstreamRejected | Self::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::PayloadTooLarge
            | Self::InvalidImage
            | Self::InvalidColor => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::AssetNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_client_error_status() {
        assert_eq!(
            ErrorCode::RequiredField.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidColor.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::SignatureInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_upstream_is_server_error() {
        assert_eq!(
            ErrorCode::UpstreamError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::UpstreamRejected.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
