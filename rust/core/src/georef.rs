// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Georeference Extraction
//!
//! Recovers the IfcMapConversion anchor, the true-north direction of the
//! model context and the projected CRS identifier from raw IFC text.
//!
//! Each fact is extracted on its own and is optional: a missing record, or a
//! malformed numeric field inside it, yields `None` for that fact only. Only
//! the first matching record of each kind is considered.

use memchr::memmem;

use crate::parser::{parse_token, split_arguments, EntityScanner, Token};

const MAP_CONVERSION: &str = "IFCMAPCONVERSION";
const REPRESENTATION_CONTEXT: &str = "IFCGEOMETRICREPRESENTATIONCONTEXT";
const DIRECTION: &str = "IFCDIRECTION";

// IfcMapConversion: SourceCRS, TargetCRS, Eastings, Northings,
// OrthogonalHeight, XAxisAbscissa, XAxisOrdinate, Scale
const EASTINGS: usize = 2;
const NORTHINGS: usize = 3;
const ORTHOGONAL_HEIGHT: usize = 4;
const X_AXIS_ABSCISSA: usize = 5;
const X_AXIS_ORDINATE: usize = 6;
const SCALE: usize = 7;

// IfcGeometricRepresentationContext: ContextIdentifier, ContextType,
// CoordinateSpaceDimension, Precision, WorldCoordinateSystem, TrueNorth
const TRUE_NORTH: usize = 5;

const EPSG_PREFIX: &[u8] = b"EPSG:";

/// Model origin in its native projected CRS
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoAnchor {
    pub easting: f64,
    pub northing: f64,
    /// Orthogonal height above the vertical datum
    pub elevation: f64,
    /// Identifier of the projected CRS, when known (e.g. "EPSG:2951")
    pub source_crs: Option<String>,
}

impl GeoAnchor {
    pub fn new(easting: f64, northing: f64, elevation: f64) -> Self {
        Self {
            easting,
            northing,
            elevation,
            source_crs: None,
        }
    }

    pub fn with_source_crs(mut self, source_crs: Option<String>) -> Self {
        self.source_crs = source_crs;
        self
    }
}

/// True-north direction in the model's local XY plane.
/// Not necessarily normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionVector {
    pub x: f64,
    pub y: f64,
}

impl DirectionVector {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build from an IFC direction ratio list; extra components (Z) are ignored
    pub fn from_ratios(ratios: &[f64]) -> Option<Self> {
        match ratios {
            [x, y, ..] => Some(Self::new(*x, *y)),
            _ => None,
        }
    }
}

/// XAxisAbscissa / XAxisOrdinate of an IfcMapConversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XAxis {
    pub abscissa: f64,
    pub ordinate: f64,
}

/// Numeric attributes of the first IfcMapConversion record
#[derive(Debug, Clone, PartialEq)]
pub struct MapConversion {
    pub eastings: f64,
    pub northings: f64,
    pub orthogonal_height: f64,
    pub x_axis: Option<XAxis>,
    pub scale: Option<f64>,
}

impl MapConversion {
    #[inline]
    pub fn anchor(&self) -> GeoAnchor {
        GeoAnchor::new(self.eastings, self.northings, self.orthogonal_height)
    }
}

/// Everything one extraction pass found
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoRefExtract {
    pub anchor: Option<GeoAnchor>,
    pub direction: Option<DirectionVector>,
    pub crs_id: Option<String>,
    pub x_axis: Option<XAxis>,
    pub scale: Option<f64>,
}

impl GeoRefExtract {
    /// A model without an anchor has to be placed by hand
    #[inline]
    pub fn is_georeferenced(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Source of georeferencing facts for a model.
///
/// [`StepGeoRefExtractor`] pattern-matches STEP records; a full IFC
/// reader can implement this without touching the reprojection side.
pub trait GeoRefSource {
    fn extract(&self, content: &str) -> GeoRefExtract;

    /// Extract from raw file bytes. Invalid UTF-8 is replaced, not rejected.
    fn extract_bytes(&self, bytes: &[u8]) -> GeoRefExtract {
        self.extract(&String::from_utf8_lossy(bytes))
    }
}

/// Line-record georeference extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct StepGeoRefExtractor;

impl StepGeoRefExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the first IfcMapConversion record.
    ///
    /// Eastings and Northings must be numeric. An unset (`$`)
    /// OrthogonalHeight reads as 0; any other non-numeric value drops the
    /// whole record.
    pub fn map_conversion(content: &str) -> Option<MapConversion> {
        let mut scanner = EntityScanner::new(content);
        let (_, start, end) = scanner.first_of_type(MAP_CONVERSION)?;
        let args = split_arguments(scanner.record(start, end))?;

        let token = |index: usize| args.get(index).copied().and_then(parse_token);
        let number = |index: usize| token(index).as_ref().and_then(finite_number);

        let height = token(ORTHOGONAL_HEIGHT)?;
        let orthogonal_height = if height.is_null() {
            0.0
        } else {
            finite_number(&height)?
        };

        let x_axis = match (number(X_AXIS_ABSCISSA), number(X_AXIS_ORDINATE)) {
            (Some(abscissa), Some(ordinate)) => Some(XAxis { abscissa, ordinate }),
            _ => None,
        };

        Some(MapConversion {
            eastings: number(EASTINGS)?,
            northings: number(NORTHINGS)?,
            orthogonal_height,
            x_axis,
            scale: number(SCALE),
        })
    }

    /// Anchor from the first IfcMapConversion, without CRS
    pub fn anchor(content: &str) -> Option<GeoAnchor> {
        Self::map_conversion(content).map(|conversion| conversion.anchor())
    }

    /// True north of the first representation context that references one
    pub fn true_north(content: &str) -> Option<DirectionVector> {
        let mut scanner = EntityScanner::new(content);

        let mut direction_id = None;
        while let Some((start, end)) = scanner
            .first_of_type(REPRESENTATION_CONTEXT)
            .map(|(_, start, end)| (start, end))
        {
            direction_id = split_arguments(scanner.record(start, end))
                .and_then(|args| args.get(TRUE_NORTH).copied())
                .and_then(parse_token)
                .and_then(|token| token.as_entity_ref());
            if direction_id.is_some() {
                break;
            }
        }
        let direction_id = direction_id?;

        scanner.reset();
        let (type_name, start, end) = scanner.find_by_id(direction_id)?;
        if !type_name.eq_ignore_ascii_case(DIRECTION) {
            return None;
        }

        let args = split_arguments(scanner.record(start, end))?;
        let ratios = parse_token(args.first().copied()?)?;
        let ratios = ratios
            .as_list()?
            .iter()
            .map(finite_number)
            .collect::<Option<Vec<f64>>>()?;

        DirectionVector::from_ratios(&ratios)
    }

    /// First `EPSG:<code>` literal anywhere in the file.
    ///
    /// Codes of four or five digits are returned whole; longer digit runs
    /// are skipped.
    pub fn crs_id(content: &str) -> Option<String> {
        let bytes = content.as_bytes();

        memmem::find_iter(bytes, EPSG_PREFIX).find_map(|pos| {
            let digits_start = pos + EPSG_PREFIX.len();
            let digits = bytes[digits_start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            (4..=5)
                .contains(&digits)
                .then(|| content[pos..digits_start + digits].to_string())
        })
    }
}

impl GeoRefSource for StepGeoRefExtractor {
    fn extract(&self, content: &str) -> GeoRefExtract {
        let crs_id = Self::crs_id(content);
        let conversion = Self::map_conversion(content);

        GeoRefExtract {
            anchor: conversion
                .as_ref()
                .map(|c| c.anchor().with_source_crs(crs_id.clone())),
            direction: Self::true_north(content),
            x_axis: conversion.as_ref().and_then(|c| c.x_axis),
            scale: conversion.as_ref().and_then(|c| c.scale),
            crs_id,
        }
    }
}

/// Run the default extractor over IFC text
pub fn extract_georeference(content: &str) -> GeoRefExtract {
    StepGeoRefExtractor.extract(content)
}

#[inline]
fn finite_number(token: &Token) -> Option<f64> {
    token.as_f64().filter(|v| v.is_finite())
}
