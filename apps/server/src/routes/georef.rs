// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Georeferencing and pose endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bim2gis_reproject::{GeoPose, Point2, WGS84_ID};

use crate::error::ApiError;
use crate::services::process_georef;
use crate::types::{GeorefResponse, ManualPoseRequest, ReprojectRequest, ReprojectResponse};
use crate::AppState;

/// Extract file from multipart form data.
async fn extract_file(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let bytes = field.bytes().await?;
            tracing::debug!(size = bytes.len(), "Extracted file from multipart");
            return Ok(bytes.to_vec());
        }
    }

    tracing::warn!("No 'file' field found in multipart request");
    Err(ApiError::MissingFile)
}

/// POST /api/v1/georef - Georeference and place an IFC upload.
pub async fn georef(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GeorefResponse>, ApiError> {
    let data = extract_file(&mut multipart).await?;

    if data.len() > state.config.max_file_size_bytes() {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    // Scanning a large file is CPU-bound
    let resolver = state.resolver.clone();
    let response =
        tokio::task::spawn_blocking(move || process_georef(&data, &resolver)).await??;

    Ok(Json(response))
}

/// POST /api/v1/reproject - Reproject one point.
pub async fn reproject(
    State(state): State<AppState>,
    Json(request): Json<ReprojectRequest>,
) -> Result<Json<ReprojectResponse>, ApiError> {
    let target_crs = request.target_crs.unwrap_or_else(|| WGS84_ID.to_string());

    let point = state.resolver.reprojector().reproject(
        Point2::new(request.x, request.y),
        &request.source_crs,
        &target_crs,
    )?;

    Ok(Json(ReprojectResponse {
        x: point.x,
        y: point.y,
        source_crs: request.source_crs,
        target_crs,
    }))
}

/// POST /api/v1/pose/manual - Pose from manually entered coordinates.
pub async fn manual_pose(
    State(state): State<AppState>,
    Json(request): Json<ManualPoseRequest>,
) -> Result<Json<GeoPose>, ApiError> {
    let pose = state.resolver.resolve_manual(
        request.x,
        request.y,
        request.elevation,
        request.rotation,
    )?;

    tracing::debug!(
        longitude = pose.longitude,
        latitude = pose.latitude,
        "Resolved manual pose"
    );
    Ok(Json(pose))
}
