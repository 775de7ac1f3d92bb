use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::service::StoreError;

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();

    match response.extensions().get::<Result<(), ApiError>>() {
        Some(Ok(_)) => info!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request"
        ),
        Some(Err(value)) => error!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            value = %value,
            "Failed to process request"
        ),
        // extractor rejections and unmatched routes never reach a handler
        None => warn!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request, but no Response extension is set"
        ),
    }

    response
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum ApiError {
    #[error("No cupcake with id {0} was found")]
    NotFound(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Failed to create transaction")]
    TransactionCreationFailed,
    #[error("Database error: {0}")]
    DbError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::TransactionCreationFailed | ApiError::DbError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound(_) | ApiError::MissingField(_) => self.to_string(),
            ApiError::TransactionCreationFailed | ApiError::DbError(_) => {
                "Internal server error".to_owned()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> ApiError {
        match value {
            StoreError::NotFound(id) => ApiError::NotFound(id.to_string()),
            StoreError::Db(err) => ApiError::DbError(err.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(value: sea_orm::DbErr) -> ApiError {
        ApiError::DbError(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.public_message()
        }));
        to_response((self.status(), body), Err(self))
    }
}

pub fn to_response<T: IntoResponse>(
    response: T,               //The response that we are sending + StatusCode
    ext: Result<(), ApiError>, //The extension, that we want to give logging middleware
) -> Response {
    let mut response = response.into_response();

    response.extensions_mut().insert(ext);

    response
}
