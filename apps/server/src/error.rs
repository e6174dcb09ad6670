// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bim2gis_reproject::Error as GeoError;
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Georef(#[from] GeoError),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::Georef(err) => match err {
                GeoError::UnknownCrs(_) => (StatusCode::NOT_FOUND, "UNKNOWN_CRS"),
                GeoError::LongitudeOutOfRange(_) => {
                    (StatusCode::BAD_REQUEST, "LONGITUDE_OUT_OF_RANGE")
                }
                GeoError::InvalidZone(_) => (StatusCode::BAD_REQUEST, "INVALID_ZONE"),
                GeoError::InvalidDefinition { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_DEFINITION")
                }
                GeoError::InvalidDirection(_) => (StatusCode::BAD_REQUEST, "INVALID_DIRECTION"),
                GeoError::Transform { .. } => (StatusCode::BAD_REQUEST, "TRANSFORM_FAILED"),
                GeoError::PoseOutOfRange { .. } => (StatusCode::BAD_REQUEST, "POSE_OUT_OF_RANGE"),
                GeoError::InvalidPose(_) => (StatusCode::BAD_REQUEST, "INVALID_POSE"),
            },
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let unknown = ApiError::from(GeoError::UnknownCrs("EPSG:1".into()));
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);

        let longitude = ApiError::from(GeoError::LongitudeOutOfRange(200.0));
        assert_eq!(longitude.into_response().status(), StatusCode::BAD_REQUEST);

        let too_large = ApiError::FileTooLarge { max_mb: 1 };
        assert_eq!(too_large.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn georef_errors_keep_their_message() {
        let err = ApiError::from(GeoError::UnknownCrs("EPSG:1".into()));
        assert_eq!(err.to_string(), "Unknown CRS: EPSG:1");
    }
}
