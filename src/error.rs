use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StorageError;

pub type TodoResult<T> = Result<T, TodoError>;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Missing title")]
    MissingTitle,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Todo not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("failed to read request body: {0}")]
    Body(String),
}

impl TodoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Errors that are written to the request log before responding.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::MalformedBody(_) | Self::Body(_)
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingTitle | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::MalformedBody(_) | Self::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match status {
            StatusCode::BAD_REQUEST => format!("Bad request: {self}"),
            StatusCode::NOT_FOUND => self.to_string(),
            _ => format!("Internal Server Error: {self}"),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: TodoError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn client_errors_render_as_bad_request() {
        assert_eq!(
            render(TodoError::MissingTitle).await,
            (StatusCode::BAD_REQUEST, "Bad request: Missing title".to_string())
        );
        assert_eq!(
            render(TodoError::invalid_input("invalid query string")).await,
            (
                StatusCode::BAD_REQUEST,
                "Bad request: invalid query string".to_string()
            )
        );
    }

    #[tokio::test]
    async fn not_found_renders_plain_text() {
        assert_eq!(
            render(TodoError::NotFound).await,
            (StatusCode::NOT_FOUND, "Todo not found".to_string())
        );
    }

    #[tokio::test]
    async fn internal_errors_carry_the_underlying_message() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let message = parse.to_string();
        let err = TodoError::from(parse);
        assert!(err.is_internal());

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, format!("Internal Server Error: {message}"));
    }

    #[test]
    fn only_server_side_failures_are_internal() {
        assert!(!TodoError::MissingTitle.is_internal());
        assert!(!TodoError::NotFound.is_internal());
        assert!(!TodoError::invalid_input("x").is_internal());
        assert!(TodoError::body("reset").is_internal());
    }
}
