// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point reprojection between registered CRS
//!
//! Geographic CRS take and return degrees as (longitude, latitude); proj4rs
//! works in radians for those, so conversion happens at this boundary only.

use std::sync::Arc;

use proj4rs::transform::transform;

use crate::canada::WGS84_ID;
use crate::crs::{CrsDefinition, CrsRegistry};
use crate::error::{Error, Result};

/// 2D coordinate: (x, y) or (longitude, latitude) depending on the CRS
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Reproject one point between two explicit definitions
pub fn reproject_with(
    point: Point2,
    source: &CrsDefinition,
    target: &CrsDefinition,
) -> Result<Point2> {
    let transform_error = |reason: String| Error::Transform {
        source_crs: source.id.clone(),
        target_crs: target.id.clone(),
        reason,
    };

    if !point.is_finite() {
        return Err(transform_error(format!(
            "non-finite input ({}, {})",
            point.x, point.y
        )));
    }

    let src = source.to_proj()?;
    let dst = target.to_proj()?;

    let mut coords = if source.is_geographic() {
        (point.x.to_radians(), point.y.to_radians(), 0.0)
    } else {
        (point.x, point.y, 0.0)
    };

    transform(&src, &dst, &mut coords).map_err(|e| transform_error(format!("{:?}", e)))?;

    let result = if target.is_geographic() {
        Point2::new(coords.0.to_degrees(), coords.1.to_degrees())
    } else {
        Point2::new(coords.0, coords.1)
    };

    if !result.is_finite() {
        return Err(transform_error("non-finite result".to_string()));
    }
    Ok(result)
}

/// Registry-backed reprojection by CRS identifier
#[derive(Debug, Clone)]
pub struct Reprojector {
    registry: Arc<CrsRegistry>,
}

impl Reprojector {
    pub fn new(registry: Arc<CrsRegistry>) -> Self {
        Self { registry }
    }

    /// Reprojector over a fresh default-seeded registry
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(CrsRegistry::with_defaults()))
    }

    pub fn registry(&self) -> &Arc<CrsRegistry> {
        &self.registry
    }

    /// Fails with `UnknownCrs` before any math if either id is unregistered
    pub fn reproject(&self, point: Point2, source_id: &str, target_id: &str) -> Result<Point2> {
        let source = self.registry.get(source_id)?;
        let target = self.registry.get(target_id)?;
        reproject_with(point, &source, &target)
    }

    pub fn to_wgs84(&self, point: Point2, source_id: &str) -> Result<Point2> {
        self.reproject(point, source_id, WGS84_ID)
    }

    pub fn from_wgs84(&self, lon_lat: Point2, target_id: &str) -> Result<Point2> {
        self.reproject(lon_lat, WGS84_ID, target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_utm_18_to_wgs84() {
        let reprojector = Reprojector::with_defaults();
        let lon_lat = reprojector
            .to_wgs84(Point2::new(445518.6, 5026017.2), "EPSG:26918")
            .unwrap();
        assert_abs_diff_eq!(lon_lat.x, -75.696, epsilon = 0.01);
        assert_abs_diff_eq!(lon_lat.y, 45.386, epsilon = 0.01);
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        let reprojector = Reprojector::with_defaults();
        let point = reprojector
            .from_wgs84(Point2::new(-76.5, 45.0), "EPSG:2951")
            .unwrap();
        // the +towgs84 shift moves the point about half a metre off the meridian
        assert_abs_diff_eq!(point.x, 304800.0, epsilon = 2.0);
        // scaled meridian arc to 45°N on GRS80
        assert_abs_diff_eq!(point.y, 4_984_446.0, epsilon = 10.0);
    }

    #[test]
    fn test_unknown_crs_fails_before_math() {
        let reprojector = Reprojector::with_defaults();
        assert_eq!(
            reprojector.to_wgs84(Point2::new(0.0, 0.0), "EPSG:999999"),
            Err(Error::UnknownCrs("EPSG:999999".to_string()))
        );
        assert_eq!(
            reprojector.reproject(Point2::new(0.0, 0.0), "EPSG:2951", "nope"),
            Err(Error::UnknownCrs("nope".to_string()))
        );
    }

    #[test]
    fn test_non_finite_input() {
        let reprojector = Reprojector::with_defaults();
        let err = reprojector
            .to_wgs84(Point2::new(f64::NAN, 5026017.2), "EPSG:26918")
            .unwrap_err();
        assert!(matches!(err, Error::Transform { .. }));
    }

    #[test]
    fn test_identity_on_wgs84() {
        let reprojector = Reprojector::with_defaults();
        let point = reprojector
            .reproject(Point2::new(-75.7, 45.4), "EPSG:4326", "epsg:4326")
            .unwrap();
        assert_abs_diff_eq!(point.x, -75.7, epsilon = 1e-9);
        assert_abs_diff_eq!(point.y, 45.4, epsilon = 1e-9);
    }
}
