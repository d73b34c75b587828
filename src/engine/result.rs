use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

/// Machine-readable kind of a domain failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display, ToSchema)]
pub enum ErrorCode {
    Unauthorized,
    ValidationError,
    TimeRestriction,
    DuplicateCheckIn,
    NotFound,
    StorageError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    #[schema(example = "Only employees can check in.")]
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Uniform envelope returned by every engine operation for expected outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub errors: Vec<ApiError>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn fail(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors: vec![ApiError::new(code, message)],
        }
    }

    /// A failure that still carries a payload for the caller to render.
    pub fn fail_with(code: ErrorCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            data: Some(data),
            errors: vec![ApiError::new(code, message)],
        }
    }

    pub fn first_error_code(&self) -> Option<ErrorCode> {
        self.errors.first().map(|e| e.code)
    }

    #[cfg(test)]
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}
