//! REST API module.
//!
//! JSON view models in a success envelope, or CSV attachments.

mod activities;
mod map;
mod projects;

pub use activities::*;
pub use map::*;
pub use projects::*;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Output format requested with `format=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// `csv` selects CSV; anything else (including `html`) is JSON.
    pub fn from_param(format: Option<&str>) -> Self {
        match format.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }
}

/// A CSV file download.
pub fn csv_attachment(filename: &str, body: Vec<u8>) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{}\"", filename).as_bytes(),
    )
    .map_err(|e| AppError::Internal(format!("Invalid attachment name {:?}: {}", filename, e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_param(None), OutputFormat::Json);
        assert_eq!(OutputFormat::from_param(Some("html")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_param(Some("CSV")), OutputFormat::Csv);
    }

    #[test]
    fn test_csv_attachment_headers() {
        let response = csv_attachment("Clean water.csv", b"a,b\r\n".to_vec()).unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Clean water.csv\""
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
    }
}
