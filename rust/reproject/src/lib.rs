// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BIM2GIS Reproject
//!
//! Turns georeferencing facts extracted by [`bim2gis_core`] into a WGS84
//! [`GeoPose`], using [proj4rs](https://docs.rs/proj4rs) for the math.
//!
//! ## Overview
//!
//! - **CRS registry**: identifier to PROJ.4 definition, seeded with WGS84,
//!   MTM zone 9 and the Canadian UTM zones, extended with UTM zones on demand
//! - **Engine**: point reprojection between any two registered CRS
//! - **Rotation**: headings from true-north and x-axis vectors
//! - **Pose**: anchor + direction (or manual input) to a validated pose
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bim2gis_core::extract_georeference;
//! use bim2gis_reproject::{CrsRegistry, PoseResolver};
//!
//! let content = std::fs::read_to_string("model.ifc").unwrap();
//! let resolver = PoseResolver::with_registry(Arc::new(CrsRegistry::with_defaults()));
//!
//! match resolver.resolve(&extract_georeference(&content)).unwrap() {
//!     Some(pose) => println!("{}, {} @ {}°", pose.longitude, pose.latitude, pose.rotation_degrees),
//!     None => println!("place the model manually"),
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for definitions, points and poses

pub mod canada;
pub mod crs;
pub mod engine;
pub mod error;
pub mod pose;
pub mod rotation;
pub mod zones;

pub use canada::{UtmZoneEntry, MTM_ZONE_9_ID, UTM_CANADA, WGS84_ID};
pub use crs::{CrsDefinition, CrsRegistry};
pub use engine::{reproject_with, Point2, Reprojector};
pub use error::{Error, Result};
pub use pose::{is_lon_lat, GeoPose, PoseResolver, DEFAULT_SOURCE_CRS};
pub use rotation::{
    direction_ratios_to_degrees, direction_to_degrees, normalize_degrees, x_axis_to_degrees,
};
pub use zones::{utm_crs_id, utm_definition, utm_zone_for_longitude, UtmZoneCache};
