// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "bim2gis-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "bim2gis-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Georeferencing service placing IFC models on the globe",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/georef",
                description: "Extract georeference and WGS84 pose from an IFC upload",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/reproject",
                description: "Reproject a point between registered CRS",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/pose/manual",
                description: "Pose from manually entered coordinates",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/utm-zone/:lng",
                description: "UTM zone and CRS identifier for a longitude",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/crs",
                description: "Registered CRS identifiers",
            },
        ],
    })
}
