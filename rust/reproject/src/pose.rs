// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement of a model on the globe
//!
//! A [`GeoPose`] is recomputed whenever its inputs change: a new extraction,
//! a manual form entry, or a user override (relocation, elevation, rotation).

use std::sync::Arc;

use bim2gis_core::{DirectionVector, GeoAnchor, GeoRefExtract};

use crate::canada::MTM_ZONE_9_ID;
use crate::crs::{normalize_id, CrsRegistry};
use crate::engine::{Point2, Reprojector};
use crate::error::{Error, Result};
use crate::rotation::{direction_to_degrees, normalize_degrees};

/// CRS assumed when a model names none, or one the registry does not know
pub const DEFAULT_SOURCE_CRS: &str = MTM_ZONE_9_ID;

/// WGS84 position, elevation and heading of a model origin
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPose {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: f64,
    /// Degrees in [0, 360)
    pub rotation_degrees: f64,
}

impl GeoPose {
    /// Validated pose; rotation is folded into [0, 360) first
    pub fn new(longitude: f64, latitude: f64, elevation: f64, rotation: f64) -> Result<Self> {
        if !elevation.is_finite() {
            return Err(Error::InvalidPose(format!("elevation {}", elevation)));
        }
        if !rotation.is_finite() {
            return Err(Error::InvalidPose(format!("rotation {}", rotation)));
        }
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::PoseOutOfRange {
                longitude,
                latitude,
            });
        }

        Ok(Self {
            longitude,
            latitude,
            elevation,
            rotation_degrees: normalize_degrees(rotation),
        })
    }

    /// Same pose at a new WGS84 position (drag-to-relocate)
    pub fn relocate(&self, longitude: f64, latitude: f64) -> Result<Self> {
        Self::new(longitude, latitude, self.elevation, self.rotation_degrees)
    }

    pub fn with_elevation(&self, elevation: f64) -> Result<Self> {
        Self::new(self.longitude, self.latitude, elevation, self.rotation_degrees)
    }

    pub fn with_rotation(&self, degrees: f64) -> Result<Self> {
        Self::new(self.longitude, self.latitude, self.elevation, degrees)
    }
}

/// Whether a manual pair reads as (longitude, latitude)
#[inline]
pub fn is_lon_lat(x: f64, y: f64) -> bool {
    (-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y)
}

/// Turns extraction results or manual input into a [`GeoPose`]
#[derive(Debug, Clone)]
pub struct PoseResolver {
    reprojector: Reprojector,
    default_crs: String,
}

impl PoseResolver {
    pub fn new(reprojector: Reprojector, default_crs: impl AsRef<str>) -> Self {
        Self {
            reprojector,
            default_crs: normalize_id(default_crs.as_ref()),
        }
    }

    /// Resolver over `registry` with the MTM zone 9 default
    pub fn with_registry(registry: Arc<CrsRegistry>) -> Self {
        Self::new(Reprojector::new(registry), DEFAULT_SOURCE_CRS)
    }

    pub fn reprojector(&self) -> &Reprojector {
        &self.reprojector
    }

    pub fn default_crs(&self) -> &str {
        &self.default_crs
    }

    /// CRS an anchor is reprojected from
    pub fn source_crs_for(&self, crs_id: Option<&str>) -> String {
        match crs_id {
            Some(id) if self.reprojector.registry().contains(id) => normalize_id(id),
            Some(id) => {
                tracing::warn!(
                    crs = id,
                    fallback = %self.default_crs,
                    "Model CRS is not registered, falling back to default"
                );
                self.default_crs.clone()
            }
            None => {
                tracing::debug!(fallback = %self.default_crs, "Model names no CRS, using default");
                self.default_crs.clone()
            }
        }
    }

    /// `None` when the model carries no map conversion
    pub fn resolve(&self, extract: &GeoRefExtract) -> Result<Option<GeoPose>> {
        let Some(anchor) = extract.anchor.as_ref() else {
            tracing::debug!("No map conversion found, model needs manual placement");
            return Ok(None);
        };

        let crs_id = anchor.source_crs.as_deref().or(extract.crs_id.as_deref());
        self.place(anchor, crs_id, extract.direction.as_ref())
            .map(Some)
    }

    pub fn resolve_anchor(
        &self,
        anchor: &GeoAnchor,
        direction: Option<&DirectionVector>,
    ) -> Result<GeoPose> {
        self.place(anchor, anchor.source_crs.as_deref(), direction)
    }

    /// Manual form input. A plausible lon/lat pair is used as is; anything
    /// else is projected coordinates in the default CRS.
    pub fn resolve_manual(
        &self,
        x: f64,
        y: f64,
        elevation: f64,
        rotation: f64,
    ) -> Result<GeoPose> {
        if is_lon_lat(x, y) {
            return GeoPose::new(x, y, elevation, rotation);
        }

        let lon_lat = self
            .reprojector
            .to_wgs84(Point2::new(x, y), &self.default_crs)?;
        GeoPose::new(lon_lat.x, lon_lat.y, elevation, rotation)
    }

    fn place(
        &self,
        anchor: &GeoAnchor,
        crs_id: Option<&str>,
        direction: Option<&DirectionVector>,
    ) -> Result<GeoPose> {
        let source = self.source_crs_for(crs_id);
        let lon_lat = self
            .reprojector
            .to_wgs84(Point2::new(anchor.easting, anchor.northing), &source)?;
        let rotation = direction
            .map(direction_to_degrees)
            .transpose()?
            .unwrap_or(0.0);

        GeoPose::new(lon_lat.x, lon_lat.y, anchor.elevation, rotation)
    }
}
