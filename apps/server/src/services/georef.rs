// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Georeferencing service: extraction followed by pose resolution.

use crate::types::{GeorefResponse, ProcessingStats};
use bim2gis_core::{GeoRefSource, StepGeoRefExtractor};
use bim2gis_reproject::{x_axis_to_degrees, PoseResolver, Result};

/// Extract and place an uploaded IFC file.
///
/// A file without map conversion is a successful response with no pose; only
/// caller-facing contract violations are errors.
pub fn process_georef(data: &[u8], resolver: &PoseResolver) -> Result<GeorefResponse> {
    let total_start = std::time::Instant::now();

    tracing::info!(content_size = data.len(), "Starting IFC georeference extraction");

    let extract = StepGeoRefExtractor::new().extract_bytes(data);
    tracing::debug!(
        georeferenced = extract.is_georeferenced(),
        crs_id = ?extract.crs_id,
        has_true_north = extract.direction.is_some(),
        "Extracted georeference"
    );

    let pose = resolver.resolve(&extract)?;
    let source_crs = extract.anchor.as_ref().map(|anchor| {
        resolver.source_crs_for(anchor.source_crs.as_deref().or(extract.crs_id.as_deref()))
    });
    let x_axis_degrees = extract
        .x_axis
        .as_ref()
        .and_then(|axis| x_axis_to_degrees(axis).ok());

    let total_time_ms = total_start.elapsed().as_millis() as u64;
    tracing::info!(
        georeferenced = pose.is_some(),
        total_time_ms,
        "Georeference processing complete"
    );

    Ok(GeorefResponse {
        georeferenced: extract.is_georeferenced(),
        crs_id: extract.crs_id,
        source_crs,
        anchor: extract.anchor,
        direction: extract.direction,
        x_axis: extract.x_axis,
        x_axis_degrees,
        scale: extract.scale,
        pose,
        stats: ProcessingStats {
            file_size: data.len(),
            total_time_ms,
        },
    })
}
