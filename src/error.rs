use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failure of a single call against the Spotify Web API.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Network failure, timeout or an undecodable body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential was rejected (401).
    #[error("access token rejected")]
    Unauthorized,

    /// Any other non-2xx status.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Per-request failure of the analysis pipeline.
///
/// Every variant is surfaced to the caller as a `{kind, message}` pair. Nothing
/// here is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Not logged in. Please authenticate first.")]
    MissingCredential,

    #[error("Your session has expired. Please log in again.")]
    InvalidCredential,

    #[error("No track IDs provided.")]
    EmptyInput,

    #[error("No valid track IDs found in the request.")]
    NoValidTrackIds,

    /// The request body could not be read as the expected JSON.
    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error("Could not fetch track data. Cannot analyze these tracks.")]
    NoEnrichableTracks,

    /// The aggregator was handed zero tracks.
    #[error("Cannot summarize an empty track list.")]
    EmptyInputError,

    /// The credential could not be checked because Spotify did not answer.
    #[error("Spotify is currently unavailable: {0}")]
    UpstreamUnavailable(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingCredential | AnalysisError::InvalidCredential => "AuthError",
            AnalysisError::EmptyInput
            | AnalysisError::NoValidTrackIds
            | AnalysisError::MalformedRequest(_) => "ValidationError",
            AnalysisError::NoEnrichableTracks => "EmptyResult",
            AnalysisError::EmptyInputError => "EmptyInputError",
            AnalysisError::UpstreamUnavailable(_) => "UpstreamUnavailable",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::MissingCredential | AnalysisError::InvalidCredential => {
                StatusCode::UNAUTHORIZED
            }
            AnalysisError::EmptyInput
            | AnalysisError::NoValidTrackIds
            | AnalysisError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AnalysisError::NoEnrichableTracks | AnalysisError::EmptyInputError => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AnalysisError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.message(),
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
