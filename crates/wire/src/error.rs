// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP-like status codes and the protocol error taxonomy for the API
//! server boundary.

use serde::{Deserialize, Serialize};

/// Status codes the API server may return, per request (not per instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    BadRequest = 400,
    NotFound = 404,
    UnprocessableEntity = 422,
    InternalError = 500,
}

impl ApiErrorCode {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Errors raised while handling one API request, before any per-instance
/// resource logic runs.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed request body: {0}")]
    MalformedJson(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("missing or invalid field: {0}")]
    InvalidField(String),
    #[error("invalid instance match criteria: {0}")]
    InvalidCriteria(String),
    #[error("{0}")]
    HandlerError(String),
    #[error("unexpected API handler error")]
    Unexpected,
}

impl ProtocolError {
    pub fn code(&self) -> ApiErrorCode {
        match self {
            Self::MalformedJson(_) => ApiErrorCode::BadRequest,
            Self::UnknownResource(_) => ApiErrorCode::NotFound,
            Self::InvalidField(_) | Self::InvalidCriteria(_) => ApiErrorCode::UnprocessableEntity,
            Self::HandlerError(_) => ApiErrorCode::UnprocessableEntity,
            Self::Unexpected => ApiErrorCode::InternalError,
        }
    }
}

/// `{reason}` body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub reason: String,
}

impl From<&ProtocolError> for ApiErrorBody {
    fn from(err: &ProtocolError) -> Self {
        Self { reason: err.to_string() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
