// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use bim2gis_reproject::{CrsDefinition, CrsRegistry, Point2, Reprojector, WGS84_ID};
use std::sync::Arc;

/// Longitude near the middle of a definition's valid area
fn probe_longitude(definition: &CrsDefinition) -> f64 {
    let param = |name: &str| {
        definition
            .proj_string
            .split_whitespace()
            .find_map(|p| p.strip_prefix(name))
            .and_then(|v| v.parse::<f64>().ok())
    };

    if let Some(zone) = param("+zone=") {
        -183.0 + 6.0 * zone + 0.5
    } else {
        param("+lon_0=").map(|lon| lon + 0.5).unwrap_or(-75.7)
    }
}

#[test]
fn every_registered_crs_round_trips() {
    let reprojector = Reprojector::with_defaults();
    let registry = reprojector.registry().clone();

    for id in registry.ids() {
        let definition = registry.get(&id).unwrap();
        let lon_lat = Point2::new(probe_longitude(&definition), 52.0);

        if definition.is_geographic() {
            let there = reprojector.from_wgs84(lon_lat, &id).unwrap();
            let back = reprojector.to_wgs84(there, &id).unwrap();
            assert_abs_diff_eq!(back.x, lon_lat.x, epsilon = 1e-6);
            assert_abs_diff_eq!(back.y, lon_lat.y, epsilon = 1e-6);
            continue;
        }

        let original = reprojector.from_wgs84(lon_lat, &id).unwrap();
        let wgs84 = reprojector.to_wgs84(original, &id).unwrap();
        let back = reprojector.from_wgs84(wgs84, &id).unwrap();

        assert_abs_diff_eq!(wgs84.x, lon_lat.x, epsilon = 1e-6);
        assert_abs_diff_eq!(wgs84.y, lon_lat.y, epsilon = 1e-6);
        assert!(
            (back.x - original.x).abs() < 1e-3 && (back.y - original.y).abs() < 1e-3,
            "{}: {:?} -> {:?} -> {:?}",
            id,
            original,
            wgs84,
            back
        );
    }
}

#[test]
fn nad83_and_csrs_codes_agree() {
    let reprojector = Reprojector::with_defaults();
    let point = Point2::new(445518.6, 5026017.2);

    let nad83 = reprojector.to_wgs84(point, "EPSG:26918").unwrap();
    let csrs = reprojector.to_wgs84(point, "EPSG:3166").unwrap();
    assert_eq!(nad83, csrs);
}

#[test]
fn synthesized_zone_outside_canada_reprojects() {
    let registry = Arc::new(CrsRegistry::with_defaults());
    let definition = registry.ensure_utm_zone_for_longitude(2.35).unwrap();
    assert_eq!(definition.id, "EPSG:26931");

    let reprojector = Reprojector::new(registry);
    let paris = Point2::new(2.3522, 48.8566);
    let projected = reprojector.from_wgs84(paris, &definition.id).unwrap();
    assert_abs_diff_eq!(projected.x, 452_000.0, epsilon = 2_000.0);

    let back = reprojector.reproject(projected, &definition.id, WGS84_ID).unwrap();
    assert_abs_diff_eq!(back.x, paris.x, epsilon = 1e-6);
    assert_abs_diff_eq!(back.y, paris.y, epsilon = 1e-6);
}

#[test]
fn concurrent_zone_registration_is_idempotent() {
    let registry = Arc::new(CrsRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.ensure_utm_zone(18).unwrap())
        })
        .collect();

    let definitions: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(definitions.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(registry.ids(), vec!["EPSG:26918".to_string()]);
}
