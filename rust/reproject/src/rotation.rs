// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heading angles from IFC direction vectors
//!
//! All results are degrees in `[0, 360)`.

use bim2gis_core::{DirectionVector, XAxis};

use crate::error::{Error, Result};

/// Heading of a true-north vector: `atan2(x, y)`, measured clockwise from +Y.
///
/// (0, 1) is 0°, (1, 0) is 90°, (-1, 0) is 270°.
pub fn direction_to_degrees(direction: &DirectionVector) -> Result<f64> {
    if !direction.x.is_finite() || !direction.y.is_finite() {
        return Err(Error::InvalidDirection(format!(
            "non-finite components ({}, {})",
            direction.x, direction.y
        )));
    }

    let degrees = direction.x.atan2(direction.y).to_degrees();
    Ok(normalize_degrees((degrees + 360.0) % 360.0))
}

/// Same as [`direction_to_degrees`] for raw `DirectionRatios`
pub fn direction_ratios_to_degrees(ratios: Option<&[f64]>) -> Result<f64> {
    let ratios =
        ratios.ok_or_else(|| Error::InvalidDirection("missing direction ratios".to_string()))?;
    let direction = DirectionVector::from_ratios(ratios).ok_or_else(|| {
        Error::InvalidDirection(format!(
            "expected at least 2 components, got {}",
            ratios.len()
        ))
    })?;
    direction_to_degrees(&direction)
}

/// Angle of a map conversion x axis: `atan2(ordinate, abscissa)`, measured
/// counter-clockwise from easting
pub fn x_axis_to_degrees(axis: &XAxis) -> Result<f64> {
    if !axis.abscissa.is_finite() || !axis.ordinate.is_finite() {
        return Err(Error::InvalidDirection(format!(
            "non-finite x axis ({}, {})",
            axis.abscissa, axis.ordinate
        )));
    }
    Ok(normalize_degrees(
        axis.ordinate.atan2(axis.abscissa).to_degrees(),
    ))
}

/// Fold any finite angle into `[0, 360)`
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
