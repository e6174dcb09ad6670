// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;

/// Body of `POST /api/v1/reproject`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReprojectRequest {
    pub x: f64,
    pub y: f64,
    pub source_crs: String,
    /// Defaults to EPSG:4326.
    #[serde(default)]
    pub target_crs: Option<String>,
}

/// Body of `POST /api/v1/pose/manual`.
///
/// `x`/`y` are longitude/latitude when they fit those ranges, otherwise
/// projected coordinates in the default CRS.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualPoseRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub rotation: f64,
}
