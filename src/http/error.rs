//! Error responses.
//!
//! Every failure renders as
//! `{"error":{"type":"...","reason":"..."},"status":N}`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::reroute::RerouteError;
use crate::xcontent::ParamError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Params(#[from] ParamError),

    #[error(transparent)]
    Reroute(#[from] RerouteError),

    #[error("request [{path}] contains unrecognized parameter: [{param}]")]
    UnrecognizedParameter { path: String, param: String },

    #[error("failed to parse request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("missing or invalid authentication credentials for REST request [{0}]")]
    Unauthorized(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Error type name reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Params(_)
            | ApiError::Reroute(_)
            | ApiError::UnrecognizedParameter { .. } => "illegal_argument_exception",
            ApiError::Body(_) => "x_content_parse_exception",
            ApiError::Unauthorized(_) => "security_exception",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), kind = self.kind(), error = %self, "Request failed");

        let body = json!({
            "error": {
                "type": self.kind(),
                "reason": self.to_string(),
            },
            "status": status.as_u16(),
        });

        let mut response = (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer realm=\"cluster-reroute\""),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_kind() {
        let err = ApiError::from(ParamError::UnknownMetric("shards".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "illegal_argument_exception");

        let err = ApiError::Unauthorized("/_cluster/state".into());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.kind(), "security_exception");
    }

    #[test]
    fn test_unrecognized_parameter_reason() {
        let err = ApiError::UnrecognizedParameter {
            path: "/_cluster/reroute".into(),
            param: "verbose".into(),
        };
        assert_eq!(
            err.to_string(),
            "request [/_cluster/reroute] contains unrecognized parameter: [verbose]"
        );
    }
}
