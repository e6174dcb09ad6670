// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CRS registry endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use bim2gis_reproject::utm_zone_for_longitude;

use crate::error::ApiError;
use crate::types::{CrsListResponse, UtmZoneResponse};
use crate::AppState;

/// GET /api/v1/crs - Registered CRS identifiers.
pub async fn list(State(state): State<AppState>) -> Json<CrsListResponse> {
    let ids = state.resolver.reprojector().registry().ids();
    Json(CrsListResponse {
        count: ids.len(),
        default_crs: state.resolver.default_crs().to_string(),
        ids,
    })
}

/// GET /api/v1/utm-zone/:lng - UTM zone for a longitude, registering its
/// definition so it can be used as a reprojection source right away.
pub async fn utm_zone(
    State(state): State<AppState>,
    Path(lng): Path<f64>,
) -> Result<Json<UtmZoneResponse>, ApiError> {
    let zone = utm_zone_for_longitude(lng)?;
    let definition = state.resolver.reprojector().registry().ensure_utm_zone(zone)?;

    Ok(Json(UtmZoneResponse {
        longitude: lng,
        zone,
        crs_id: definition.id,
    }))
}
