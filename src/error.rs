use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::WavDecodeError;
use crate::recognizer::RecognizeError;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub mod error_codes {
    pub const MISSING_INPUT: &str = "missing_input";
    pub const NOT_WAV: &str = "not_wav";
    pub const INVALID_WAV: &str = "invalid_wav";
    pub const UNKNOWN_LANGUAGE: &str = "unknown_language";
    pub const UNKNOWN_SOURCE: &str = "unknown_source";
    pub const UNINTELLIGIBLE: &str = "unintelligible";
    pub const SERVICE_ERROR: &str = "service_error";
}

/// User-visible request failures. None of these end the session; each one
/// leaves the service ready for the next attempt.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No audio provided. Record or upload a WAV file first.")]
    MissingInput,

    #[error("Input is not WAV (detected: {0}). Please use a browser/device that provides WAV.")]
    NotWav(String),

    #[error("{0}")]
    InvalidWav(#[from] WavDecodeError),

    #[error("Unsupported language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown audio source: {0}")]
    UnknownSource(String),

    #[error("Could not understand the audio.")]
    Unintelligible,

    #[error("STT service error: {0}")]
    Service(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput
            | ApiError::NotWav(_)
            | ApiError::InvalidWav(_)
            | ApiError::UnknownLanguage(_)
            | ApiError::UnknownSource(_) => StatusCode::BAD_REQUEST,
            ApiError::Unintelligible => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Service(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::MissingInput => error_codes::MISSING_INPUT,
            ApiError::NotWav(_) => error_codes::NOT_WAV,
            ApiError::InvalidWav(_) => error_codes::INVALID_WAV,
            ApiError::UnknownLanguage(_) => error_codes::UNKNOWN_LANGUAGE,
            ApiError::UnknownSource(_) => error_codes::UNKNOWN_SOURCE,
            ApiError::Unintelligible => error_codes::UNINTELLIGIBLE,
            ApiError::Service(_) => error_codes::SERVICE_ERROR,
        }
    }
}

impl From<RecognizeError> for ApiError {
    fn from(err: RecognizeError) -> Self {
        match err {
            RecognizeError::Unintelligible => ApiError::Unintelligible,
            RecognizeError::Request(msg) => ApiError::Service(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
