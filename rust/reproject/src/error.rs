// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for reprojection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations by the caller.
///
/// Unlike an absent IFC fact, these point at a bug in the calling pipeline
/// and must not be swallowed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Longitude out of range (-180 to 180): {0}")]
    LongitudeOutOfRange(f64),

    #[error("Invalid UTM zone {0}: expected 1 to 60")]
    InvalidZone(u8),

    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Invalid CRS definition for {id}: {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("Invalid direction vector: {0}")]
    InvalidDirection(String),

    #[error("Transformation from {source_crs} to {target_crs} failed: {reason}")]
    Transform {
        source_crs: String,
        target_crs: String,
        reason: String,
    },

    #[error("Pose out of range: longitude {longitude}, latitude {latitude}")]
    PoseOutOfRange { longitude: f64, latitude: f64 },

    #[error("Invalid pose value: {0}")]
    InvalidPose(String),
}
