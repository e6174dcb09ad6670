// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for BIM2GIS
//!
//! A [`GeoPlacer`] owns one CRS registry. Absent georeferencing comes back as
//! `undefined`; caller mistakes (unknown CRS, bad longitude) are thrown.

mod georef;
mod projection;

pub use projection::{direction_to_degrees, utm_zone};

use std::sync::Arc;

use bim2gis_core::GeoRefExtract;
use bim2gis_reproject::{
    x_axis_to_degrees, CrsRegistry, GeoPose, PoseResolver, Reprojector, DEFAULT_SOURCE_CRS,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::utils::js_error;

/// Georeferencing facts exposed to JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct GeoReferenceJs {
    #[wasm_bindgen(skip)]
    pub crs_id: Option<String>,
    #[wasm_bindgen(skip)]
    pub extract: GeoRefExtract,
}

#[wasm_bindgen]
impl GeoReferenceJs {
    /// EPSG identifier found in the file (e.g., "EPSG:26918")
    #[wasm_bindgen(getter, js_name = crsId)]
    pub fn crs_id(&self) -> Option<String> {
        self.crs_id.clone()
    }

    /// Whether the file carries an IfcMapConversion
    #[wasm_bindgen(getter, js_name = isGeoreferenced)]
    pub fn is_georeferenced(&self) -> bool {
        self.extract.is_georeferenced()
    }

    #[wasm_bindgen(getter)]
    pub fn eastings(&self) -> Option<f64> {
        self.extract.anchor.as_ref().map(|a| a.easting)
    }

    #[wasm_bindgen(getter)]
    pub fn northings(&self) -> Option<f64> {
        self.extract.anchor.as_ref().map(|a| a.northing)
    }

    #[wasm_bindgen(getter, js_name = orthogonalHeight)]
    pub fn orthogonal_height(&self) -> Option<f64> {
        self.extract.anchor.as_ref().map(|a| a.elevation)
    }

    /// True-north direction as `[x, y]`
    #[wasm_bindgen(getter, js_name = trueNorth)]
    pub fn true_north(&self) -> Option<Vec<f64>> {
        self.extract.direction.map(|d| vec![d.x, d.y])
    }

    /// Map conversion x axis angle in degrees, counter-clockwise from easting
    #[wasm_bindgen(getter, js_name = xAxisDegrees)]
    pub fn x_axis_degrees(&self) -> Option<f64> {
        self.extract
            .x_axis
            .as_ref()
            .and_then(|axis| x_axis_to_degrees(axis).ok())
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> Option<f64> {
        self.extract.scale
    }

    /// Transform local coordinates to map coordinates
    #[wasm_bindgen(js_name = localToMap)]
    pub fn local_to_map(&self, x: f64, y: f64, z: f64) -> Option<Vec<f64>> {
        let anchor = self.extract.anchor.as_ref()?;
        let (cos_r, sin_r) = self.axis();
        let s = self.extract.scale.unwrap_or(1.0);

        let e = s * (cos_r * x - sin_r * y) + anchor.easting;
        let n = s * (sin_r * x + cos_r * y) + anchor.northing;
        let h = z + anchor.elevation;

        Some(vec![e, n, h])
    }

    /// Transform map coordinates to local coordinates
    #[wasm_bindgen(js_name = mapToLocal)]
    pub fn map_to_local(&self, e: f64, n: f64, h: f64) -> Option<Vec<f64>> {
        let anchor = self.extract.anchor.as_ref()?;
        let (cos_r, sin_r) = self.axis();
        let inv_scale = match self.extract.scale {
            Some(s) if s.abs() >= f64::EPSILON => 1.0 / s,
            _ => 1.0,
        };

        let dx = e - anchor.easting;
        let dy = n - anchor.northing;

        let x = inv_scale * (cos_r * dx + sin_r * dy);
        let y = inv_scale * (-sin_r * dx + cos_r * dy);
        let z = h - anchor.elevation;

        Some(vec![x, y, z])
    }
}

impl GeoReferenceJs {
    /// Unit x axis; unrotated when the file gives none
    fn axis(&self) -> (f64, f64) {
        match self.extract.x_axis {
            Some(axis) => {
                let len = axis.abscissa.hypot(axis.ordinate);
                if len > f64::EPSILON {
                    (axis.abscissa / len, axis.ordinate / len)
                } else {
                    (1.0, 0.0)
                }
            }
            None => (1.0, 0.0),
        }
    }
}

impl From<GeoRefExtract> for GeoReferenceJs {
    fn from(extract: GeoRefExtract) -> Self {
        Self {
            crs_id: extract.crs_id.clone(),
            extract,
        }
    }
}

/// WGS84 placement exposed to JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct GeoPoseJs {
    #[wasm_bindgen(skip)]
    pub pose: GeoPose,
}

#[wasm_bindgen]
impl GeoPoseJs {
    #[wasm_bindgen(getter)]
    pub fn longitude(&self) -> f64 {
        self.pose.longitude
    }

    #[wasm_bindgen(getter)]
    pub fn latitude(&self) -> f64 {
        self.pose.latitude
    }

    #[wasm_bindgen(getter)]
    pub fn elevation(&self) -> f64 {
        self.pose.elevation
    }

    /// Heading in degrees, [0, 360)
    #[wasm_bindgen(getter, js_name = rotationDegrees)]
    pub fn rotation_degrees(&self) -> f64 {
        self.pose.rotation_degrees
    }

    /// Same pose at a new position (drag-to-relocate)
    pub fn relocate(&self, longitude: f64, latitude: f64) -> Result<GeoPoseJs, JsError> {
        self.pose
            .relocate(longitude, latitude)
            .map(GeoPoseJs::from)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = withElevation)]
    pub fn with_elevation(&self, elevation: f64) -> Result<GeoPoseJs, JsError> {
        self.pose
            .with_elevation(elevation)
            .map(GeoPoseJs::from)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = withRotation)]
    pub fn with_rotation(&self, degrees: f64) -> Result<GeoPoseJs, JsError> {
        self.pose
            .with_rotation(degrees)
            .map(GeoPoseJs::from)
            .map_err(js_error)
    }
}

impl From<GeoPose> for GeoPoseJs {
    fn from(pose: GeoPose) -> Self {
        Self { pose }
    }
}

/// Options accepted by the `GeoPlacer` constructor
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoPlacerOptions {
    /// CRS for models that name none, or an unknown one
    pub default_crs: String,
}

impl Default for GeoPlacerOptions {
    fn default() -> Self {
        Self {
            default_crs: DEFAULT_SOURCE_CRS.to_string(),
        }
    }
}

/// Main BIM2GIS API
#[wasm_bindgen]
pub struct GeoPlacer {
    resolver: PoseResolver,
}

#[wasm_bindgen]
impl GeoPlacer {
    /// Create a placer over the default Canadian CRS registry.
    ///
    /// Example:
    /// ```javascript
    /// const placer = new GeoPlacer({ defaultCrs: 'EPSG:2951' });
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<GeoPlacer, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let options = if options.is_undefined() || options.is_null() {
            GeoPlacerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?
        };

        Self::with_options(options).map_err(js_error)
    }

    /// Default CRS in use
    #[wasm_bindgen(getter, js_name = defaultCrs)]
    pub fn default_crs(&self) -> String {
        self.resolver.default_crs().to_string()
    }

    /// Get version string
    #[wasm_bindgen(getter)]
    pub fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

impl GeoPlacer {
    /// Rust-side constructor; the default CRS must be registered
    pub fn with_options(options: GeoPlacerOptions) -> bim2gis_reproject::Result<Self> {
        let registry = Arc::new(CrsRegistry::with_defaults());
        registry.get(&options.default_crs)?;

        Ok(Self {
            resolver: PoseResolver::new(Reprojector::new(registry), &options.default_crs),
        })
    }

    pub(crate) fn resolver(&self) -> &PoseResolver {
        &self.resolver
    }
}
