// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use bim2gis_core::{DirectionVector, GeoAnchor, XAxis};
use bim2gis_reproject::GeoPose;
use serde::{Deserialize, Serialize};

/// Georeferencing result for an uploaded IFC file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeorefResponse {
    /// Whether the file carries an IfcMapConversion.
    pub georeferenced: bool,
    /// EPSG identifier found in the file.
    pub crs_id: Option<String>,
    /// CRS the anchor was actually reprojected from (after fallback).
    pub source_crs: Option<String>,
    pub anchor: Option<GeoAnchor>,
    /// True-north direction.
    pub direction: Option<DirectionVector>,
    pub x_axis: Option<XAxis>,
    /// Map conversion x axis angle, counter-clockwise from easting.
    pub x_axis_degrees: Option<f64>,
    pub scale: Option<f64>,
    /// Absent when the model needs manual placement.
    pub pose: Option<GeoPose>,
    pub stats: ProcessingStats,
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Uploaded file size in bytes.
    pub file_size: usize,
    /// Total processing time (ms).
    pub total_time_ms: u64,
}

/// Reprojected point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReprojectResponse {
    pub x: f64,
    pub y: f64,
    pub source_crs: String,
    pub target_crs: String,
}

/// UTM zone lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtmZoneResponse {
    pub longitude: f64,
    pub zone: u8,
    /// Registry identifier of the zone, registered on demand.
    pub crs_id: String,
}

/// Registered CRS identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrsListResponse {
    pub count: usize,
    pub default_crs: String,
    pub ids: Vec<String>,
}
