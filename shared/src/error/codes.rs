//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 6xxx: Product errors
//! - 7xxx: Media errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the UI can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Payload exceeds the configured size limit
    PayloadTooLarge = 9,

    // ==================== 1xxx: Auth ====================
    /// Webhook signature missing or invalid
    SignatureInvalid = 1004,
    /// Webhook timestamp outside the accepted window
    SignatureExpired = 1005,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// No product matches the external asset id
    AssetNotFound = 6002,
    /// Uploaded file is not a supported image
    InvalidImage = 6003,
    /// Requested color name is not usable in a transformation
    InvalidColor = 6004,

    // ==================== 7xxx: Media ====================
    /// External image service request failed
    UpstreamError = 7001,
    /// External image service rejected the upload
    UpstreamRejected = 7002,

    // ==================== 9xxx: System ====================
    /// Storage backend error
    StorageError = 9002,
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
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::PayloadTooLarge => "Payload too large",

            ErrorCode::SignatureInvalid => "Invalid webhook signature",
            ErrorCode::SignatureExpired => "Webhook signature has expired",

            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::AssetNotFound => "Product not found",
            ErrorCode::InvalidImage => "Unsupported or invalid image",
            ErrorCode::InvalidColor => "Invalid color name",

            ErrorCode::UpstreamError => "Image service request failed",
            ErrorCode::UpstreamRejected => "Image service rejected the upload",

            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
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
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::PayloadTooLarge),

            1004 => Ok(ErrorCode::SignatureInvalid),
            1005 => Ok(ErrorCode::SignatureExpired),

            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::AssetNotFound),
            6003 => Ok(ErrorCode::InvalidImage),
            6004 => Ok(ErrorCode::InvalidColor),

            7001 => Ok(ErrorCode::UpstreamError),
            7002 => Ok(ErrorCode::UpstreamRejected),

            9002 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
