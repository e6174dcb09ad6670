// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reprojection and CRS registry methods for the BIM2GIS API

use super::GeoPlacer;
use crate::utils::js_error;
use bim2gis_core::DirectionVector;
use bim2gis_reproject::{CrsDefinition, Point2, WGS84_ID};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
impl GeoPlacer {
    /// Reproject a point; returns `[x, y]` (longitude, latitude for WGS84).
    /// `target_crs` defaults to EPSG:4326.
    pub fn reproject(
        &self,
        x: f64,
        y: f64,
        source_crs: String,
        target_crs: Option<String>,
    ) -> Result<Vec<f64>, JsError> {
        let target = target_crs.as_deref().unwrap_or(WGS84_ID);
        self.resolver()
            .reprojector()
            .reproject(Point2::new(x, y), &source_crs, target)
            .map(|p| vec![p.x, p.y])
            .map_err(js_error)
    }

    /// Register a PROJ.4 definition; throws if proj4rs rejects it
    #[wasm_bindgen(js_name = registerCrs)]
    pub fn register_crs(&self, id: String, proj: String) -> Result<(), JsError> {
        self.resolver()
            .reprojector()
            .registry()
            .register(CrsDefinition::new(id, proj))
            .map_err(js_error)
    }

    /// Registered identifiers, sorted
    #[wasm_bindgen(js_name = crsIds)]
    pub fn crs_ids(&self) -> Vec<String> {
        self.resolver().reprojector().registry().ids()
    }

    /// Register the UTM zone containing `lng` and return its identifier
    #[wasm_bindgen(js_name = ensureUtmZone)]
    pub fn ensure_utm_zone(&self, lng: f64) -> Result<String, JsError> {
        self.resolver()
            .reprojector()
            .registry()
            .ensure_utm_zone_for_longitude(lng)
            .map(|definition| definition.id)
            .map_err(js_error)
    }
}

/// UTM zone (1-60) containing a longitude
#[wasm_bindgen(js_name = utmZone)]
pub fn utm_zone(lng: f64) -> Result<u8, JsError> {
    bim2gis_reproject::utm_zone_for_longitude(lng).map_err(js_error)
}

/// Heading in degrees of a true-north vector
#[wasm_bindgen(js_name = directionToDegrees)]
pub fn direction_to_degrees(x: f64, y: f64) -> Result<f64, JsError> {
    bim2gis_reproject::direction_to_degrees(&DirectionVector::new(x, y)).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::super::GeoPlacerOptions;
    use super::*;

    fn placer() -> GeoPlacer {
        GeoPlacer::with_options(GeoPlacerOptions::default()).unwrap()
    }

    #[test]
    fn test_reproject_defaults_to_wgs84() {
        let lon_lat = placer()
            .reproject(445518.6, 5026017.2, "EPSG:26918".to_string(), None)
            .ok()
            .unwrap();
        assert!((lon_lat[0] + 75.696).abs() < 0.01);
        assert!((lon_lat[1] - 45.386).abs() < 0.01);
    }

    #[test]
    fn test_register_and_list() {
        let placer = placer();
        assert!(placer
            .register_crs(
                "EPSG:32618".to_string(),
                "+proj=utm +zone=18 +datum=WGS84 +units=m +no_defs".to_string()
            )
            .is_ok());
        assert!(placer.crs_ids().contains(&"EPSG:32618".to_string()));
        assert_eq!(placer.ensure_utm_zone(2.35).ok().as_deref(), Some("EPSG:26931"));
    }

    #[test]
    fn test_free_functions() {
        assert_eq!(utm_zone(-75.7).ok(), Some(18));
        let degrees = direction_to_degrees(-0.7071, 0.7071).ok().unwrap();
        assert!((degrees - 315.0).abs() < 1e-9);
    }
}
