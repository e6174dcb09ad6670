// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Georeference extraction and pose methods for the BIM2GIS API

use super::{GeoPlacer, GeoPoseJs, GeoReferenceJs};
use crate::utils::js_error;
use bim2gis_core::extract_georeference;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
impl GeoPlacer {
    /// Extract georeferencing facts from IFC content.
    /// Every field is optional; nothing here throws.
    ///
    /// Example:
    /// ```javascript
    /// const georef = placer.getGeoReference(ifcText);
    /// if (georef.isGeoreferenced) {
    ///   const [e, n, h] = georef.localToMap(10, 20, 5);
    /// }
    /// ```
    #[wasm_bindgen(js_name = getGeoReference)]
    pub fn get_geo_reference(&self, content: String) -> GeoReferenceJs {
        GeoReferenceJs::from(extract_georeference(&content))
    }

    /// Extract and place a model in one step.
    /// Returns undefined when the file has no IfcMapConversion.
    ///
    /// Example:
    /// ```javascript
    /// const pose = placer.resolvePose(ifcText);
    /// if (pose) {
    ///   viewer.place(pose.longitude, pose.latitude, pose.elevation, pose.rotationDegrees);
    /// } else {
    ///   showManualPlacementForm();
    /// }
    /// ```
    #[wasm_bindgen(js_name = resolvePose)]
    pub fn resolve_pose(&self, content: String) -> Result<Option<GeoPoseJs>, JsError> {
        let extract = extract_georeference(&content);
        self.resolver()
            .resolve(&extract)
            .map(|pose| pose.map(GeoPoseJs::from))
            .map_err(js_error)
    }

    /// Pose from manual form input: lon/lat when plausible, otherwise
    /// projected coordinates in the default CRS
    #[wasm_bindgen(js_name = resolveManual)]
    pub fn resolve_manual(
        &self,
        x: f64,
        y: f64,
        elevation: f64,
        rotation: f64,
    ) -> Result<GeoPoseJs, JsError> {
        self.resolver()
            .resolve_manual(x, y, elevation, rotation)
            .map(GeoPoseJs::from)
            .map_err(js_error)
    }
}
