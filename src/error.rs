use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("chat completion failed: {0}")]
    ChatApi(String),

    #[error("image generation failed: {0}")]
    ImageApi(String),

    #[error("storage upload failed: {0}")]
    Storage(String),

    #[error("on-chain transaction failed: {0}")]
    Chain(String),

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("file system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArtError>;

// Validation failures carry their message back to the caller; everything
// else is logged with full detail and answered with a generic body.
impl ResponseError for ArtError {
    fn status_code(&self) -> StatusCode {
        match self {
            ArtError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ArtError::Validation(message) => HttpResponse::BadRequest().body(message.clone()),
            other => {
                error!("Error processing request: {}", other);
                HttpResponse::InternalServerError().body("Error processing your request")
            }
        }
    }
}
