use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;

pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

/// JSON body returned for every failed request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { success: false, error: status.as_u16(), message: message.into() }
    }
}

/// Renders an envelope with `status` and tags the response with `code` in `X-Error-Code`.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let mut resp = (status, Json(ErrorEnvelope::new(status, message))).into_response();
    if let Ok(val) = HeaderValue::from_str(code) {
        resp.headers_mut().insert(ERROR_CODE_HEADER, val);
    }
    resp
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: Option<String> },
    Unauthorized,
    NotFound,
    Unprocessable { message: Option<String> },
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal { message: Some(e.to_string()) }
    }
    pub fn bad_request() -> Self { Self::BadRequest { message: None } }
    pub fn unprocessable() -> Self { Self::Unprocessable { message: None } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound => "not_found",
            ApiError::Unprocessable { .. } => "unprocessable",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::BadRequest { message } => message.unwrap_or_else(|| "Bad Request".into()),
            ApiError::Unauthorized => "Unauthorized".into(),
            ApiError::NotFound => "resource not found".into(),
            ApiError::Unprocessable { message } => {
                message.unwrap_or_else(|| "unprocessable".into())
            }
            // Internal details are logged by the caller, never echoed.
            ApiError::Internal { .. } => "Internal Server Error".into(),
        };
        error_response(status, code, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
