//! HTTP rendering of catalog errors.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use katalog_core::{Error, ErrorKind};

/// Map an error category onto an HTTP status.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Data | ErrorKind::Configuration | ErrorKind::Io => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn category(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "configuration",
        ErrorKind::NotFound => "not_found",
        ErrorKind::Upstream => "upstream",
        ErrorKind::Data => "data",
        ErrorKind::Io => "io",
    }
}

/// A catalog error rendered as a JSON response.
///
/// The body has the shape `{"error": {"category": ..., "message": ...}}`.
#[derive(Debug)]
pub struct ErrorResponse(pub Error);

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let body = serde_json::json!({
            "error": {
                "category": category(kind),
                "message": self.0.to_string(),
            }
        });

        (
            status_for(kind),
            [(http::header::CONTENT_TYPE, "application/json")],
            serde_json::to_string(&body).unwrap_or_default(),
        )
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Upstream), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorKind::Data),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_response() {
        let resp = ErrorResponse::from(Error::not_found("brand", "atlantis")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_upstream_response() {
        let resp = ErrorResponse(Error::upstream("holdings", "timed out")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
