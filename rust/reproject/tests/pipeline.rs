// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use bim2gis_core::{extract_georeference, GeoRefSource, StepGeoRefExtractor};
use bim2gis_reproject::{x_axis_to_degrees, CrsRegistry, PoseResolver};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn load_sample() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("core")
        .join("tests")
        .join("ifc")
        .join("ottawa_pavilion.ifc");

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Test IFC file not found at {}: {}", path.display(), e))
}

fn resolver() -> PoseResolver {
    PoseResolver::with_registry(Arc::new(CrsRegistry::with_defaults()))
}

#[test]
fn ifc_file_to_pose() {
    let extract = StepGeoRefExtractor::new().extract(&load_sample());
    let pose = resolver().resolve(&extract).unwrap().expect("georeferenced");

    assert_abs_diff_eq!(pose.longitude, -75.7, epsilon = 0.1);
    assert_abs_diff_eq!(pose.latitude, 45.4, epsilon = 0.1);
    assert_abs_diff_eq!(pose.elevation, 59.1);
    assert_abs_diff_eq!(pose.rotation_degrees, 315.0, epsilon = 1e-9);

    let x_axis = extract.x_axis.expect("x axis");
    assert_abs_diff_eq!(x_axis_to_degrees(&x_axis).unwrap(), 45.0, epsilon = 1e-9);
}

#[test]
fn model_without_map_conversion_needs_manual_placement() {
    let content: String = load_sample()
        .lines()
        .filter(|line| !line.contains("IFCMAPCONVERSION"))
        .collect::<Vec<_>>()
        .join("\n");

    let resolver = resolver();
    assert_eq!(resolver.resolve(&extract_georeference(&content)), Ok(None));

    let pose = resolver.resolve_manual(-75.7, 45.4, 70.0, 315.0).unwrap();
    assert_eq!((pose.longitude, pose.latitude), (-75.7, 45.4));
}

#[test]
fn unregistered_model_crs_uses_default() {
    let content = load_sample()
        .replace("'EPSG:26918'", "'EPSG:32618'")
        .replace("445518.6,5026017.2", "367000.,5030000.");

    let extract = extract_georeference(&content);
    assert_eq!(extract.crs_id.as_deref(), Some("EPSG:32618"));

    let pose = resolver().resolve(&extract).unwrap().expect("georeferenced");
    assert_abs_diff_eq!(pose.longitude, -75.7, epsilon = 0.1);
    assert_abs_diff_eq!(pose.latitude, 45.4, epsilon = 0.1);
}

#[test]
fn model_without_true_north_faces_north() {
    let content = load_sample().replace(",#71);", ",$);");
    let extract = extract_georeference(&content);
    assert_eq!(extract.direction, None);

    let pose = resolver().resolve(&extract).unwrap().expect("georeferenced");
    assert_eq!(pose.rotation_degrees, 0.0);
}
