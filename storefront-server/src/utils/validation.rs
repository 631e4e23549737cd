//! Input validation helpers for the upload form

use image::ImageFormat;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

// ── Limits ──────────────────────────────────────────────────────────

/// Product names
pub const MAX_NAME_LEN: usize = 200;

/// Color names, after trimming
pub const MAX_COLOR_LEN: usize = 64;

/// Colors per upload
pub const MAX_COLORS: usize = 20;

/// Accepted image formats (sniffed from the bytes, not the filename)
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Avif,
];

// ── Helpers ─────────────────────────────────────────────────────────

/// Trimmed product name, or an error if empty or too long.
pub fn validate_name(value: &str) -> Result<String, AppError> {
    let name = value.trim();
    if name.is_empty() {
        return Err(AppError::required("name"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "name is too long ({} chars, max {MAX_NAME_LEN})",
            name.chars().count()
        ))
        .with_detail("field", "name"));
    }
    Ok(name.to_string())
}

/// Lenient price parsing: absent, unparsable or negative input becomes zero.
pub fn parse_price(value: Option<&str>) -> Decimal {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<Decimal>().ok())
        .filter(|p| !p.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Parse the `colors` form field (a JSON array of strings).
///
/// Names are trimmed, a leading `#` is dropped, blanks are skipped and
/// duplicates keep their first position.
pub fn parse_colors(value: Option<&str>) -> Result<Vec<String>, AppError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(Vec::new());
    };

    let parsed: Vec<String> = serde_json::from_str(raw).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid colors: {e}"))
            .with_detail("field", "colors")
    })?;

    let mut colors: Vec<String> = Vec::with_capacity(parsed.len());
    for color in parsed {
        let color = color.trim();
        let color = color.strip_prefix('#').unwrap_or(color);
        if color.is_empty() {
            continue;
        }
        if color.len() > MAX_COLOR_LEN
            || !color
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidColor,
                format!("Invalid color '{color}'"),
            )
            .with_detail("field", "colors"));
        }
        if !colors.iter().any(|c| c == color) {
            colors.push(color.to_string());
        }
    }

    if colors.len() > MAX_COLORS {
        return Err(AppError::with_message(
            ErrorCode::InvalidColor,
            format!("Too many colors ({}, max {MAX_COLORS})", colors.len()),
        )
        .with_detail("field", "colors"));
    }

    Ok(colors)
}

/// Check size and content of an uploaded image, returning its MIME type.
pub fn validate_image(data: &[u8], max_bytes: usize) -> Result<&'static str, AppError> {
    if data.is_empty() {
        return Err(AppError::required("file"));
    }

    if data.len() > max_bytes {
        return Err(AppError::with_message(
            ErrorCode::PayloadTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                max_bytes,
                max_bytes / 1024 / 1024
            ),
        ));
    }

    let format = image::guess_format(data)
        .map_err(|_| AppError::with_message(ErrorCode::InvalidImage, "Unrecognized image data"))?;

    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImage,
            format!(
                "Unsupported image format '{}'. Supported: png, jpeg, webp, gif, avif",
                format.extensions_str().first().copied().unwrap_or("unknown")
            ),
        ));
    }

    Ok(format.to_mime_type())
}
