// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BIM2GIS Core
//!
//! Georeference extraction for IFC files, built on a lightweight STEP record
//! scanner and a [nom](https://docs.rs/nom) argument tokenizer.
//!
//! ## Overview
//!
//! - **Record scanning**: walks `#id=TYPE(args);` records without building an
//!   entity graph, using [memchr](https://docs.rs/memchr) to find them
//! - **Argument tokenizing**: parses individual arguments on demand, so one
//!   garbled argument does not spoil the rest of a record
//! - **Georeference extraction**: map conversion anchor, true-north direction
//!   and projected CRS identifier, each optional
//!
//! ## Quick Start
//!
//! ```rust
//! use bim2gis_core::{extract_georeference, DirectionVector};
//!
//! let content = r#"
//! #20=IFCGEOMETRICREPRESENTATIONCONTEXT($,'Model',3,1.E-05,#18,#71);
//! #71=IFCDIRECTION((-0.7071,0.7071));
//! #100=IFCMAPCONVERSION(#20,#98,445518.6,5026017.2,59.1,$,$,$);
//! "#;
//!
//! let extract = extract_georeference(content);
//! let anchor = extract.anchor.expect("anchor");
//! assert_eq!(anchor.easting, 445518.6);
//! assert_eq!(extract.direction, Some(DirectionVector::new(-0.7071, 0.7071)));
//! assert_eq!(extract.crs_id, None);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for extracted data

pub mod error;
pub mod georef;
pub mod parser;

pub use error::{Error, Result};
pub use georef::{
    extract_georeference, DirectionVector, GeoAnchor, GeoRefExtract, GeoRefSource,
    MapConversion, StepGeoRefExtractor, XAxis,
};
pub use parser::{parse_entity, parse_token, split_arguments, EntityScanner, Token};
