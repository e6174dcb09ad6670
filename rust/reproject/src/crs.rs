// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CRS definitions and the identifier registry
//!
//! The registry is an explicit object shared through `Arc`, never ambient
//! state. It starts from the seed table (or empty, for isolated use) and only
//! grows afterwards, mostly by UTM zones synthesized on demand.

use std::sync::{PoisonError, RwLock};

use proj4rs::Proj;
use rustc_hash::FxHashMap;

use crate::canada::seed_definitions;
use crate::error::{Error, Result};
use crate::zones::{utm_crs_id, utm_zone_for_longitude, UtmZoneCache};

/// Named PROJ.4-style definition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrsDefinition {
    /// Normalized identifier, e.g. "EPSG:2951"
    pub id: String,
    pub proj_string: String,
}

impl CrsDefinition {
    pub fn new(id: impl AsRef<str>, proj_string: impl Into<String>) -> Self {
        Self {
            id: normalize_id(id.as_ref()),
            proj_string: proj_string.into(),
        }
    }

    /// Geographic definitions take and return degrees (longitude, latitude)
    pub fn is_geographic(&self) -> bool {
        self.proj_string.split_whitespace().any(|param| {
            matches!(
                param,
                "+proj=longlat" | "+proj=latlong" | "+proj=lonlat" | "+proj=latlon"
            )
        })
    }

    /// Compile for proj4rs. `+type=crs` only tags the string and is dropped.
    pub(crate) fn to_proj(&self) -> Result<Proj> {
        let params = self
            .proj_string
            .split_whitespace()
            .filter(|param| *param != "+type=crs")
            .collect::<Vec<_>>()
            .join(" ");

        Proj::from_proj_string(&params).map_err(|e| Error::InvalidDefinition {
            id: self.id.clone(),
            reason: format!("{:?}", e),
        })
    }
}

/// Identifiers compare case-insensitively ("epsg:2951" == "EPSG:2951")
#[inline]
pub fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}

/// Identifier → definition map, safe to share across threads.
///
/// Inserts are last-write-wins. Racing inserts of the same UTM zone write the
/// same string, so the outcome does not depend on ordering.
#[derive(Debug, Default)]
pub struct CrsRegistry {
    definitions: RwLock<FxHashMap<String, String>>,
    utm_zones: UtmZoneCache,
}

impl CrsRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with WGS84, MTM zone 9 and the Canadian UTM zones
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for definition in seed_definitions() {
            registry.insert(definition);
        }
        registry
    }

    /// Insert without validating; returns the definition it replaced
    pub fn insert(&self, definition: CrsDefinition) -> Option<CrsDefinition> {
        let CrsDefinition { id, proj_string } = definition;
        let previous = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), proj_string);

        previous.map(|proj_string| CrsDefinition { id, proj_string })
    }

    /// Validate the definition with proj4rs, then insert it
    pub fn register(&self, definition: CrsDefinition) -> Result<()> {
        definition.to_proj()?;
        tracing::debug!(crs = %definition.id, "Registering CRS definition");
        self.insert(definition);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<CrsDefinition> {
        let key = normalize_id(id);
        let proj_string = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        match proj_string {
            Some(proj_string) => Ok(CrsDefinition {
                id: key,
                proj_string,
            }),
            None => Err(Error::UnknownCrs(id.to_string())),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&normalize_id(id))
    }

    /// Registered identifiers, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Definition for a UTM zone, registering it under `EPSG:269<zone>` if
    /// it is not there yet
    pub fn ensure_utm_zone(&self, zone: u8) -> Result<CrsDefinition> {
        let id = utm_crs_id(zone)?;
        if let Ok(existing) = self.get(&id) {
            return Ok(existing);
        }

        let definition = CrsDefinition::new(&id, self.utm_zones.definition(zone)?.as_ref());
        tracing::debug!(crs = %definition.id, zone, "Registering synthesized UTM zone");
        self.insert(definition.clone());
        Ok(definition)
    }

    /// UTM zone definition for the zone containing `lng`
    pub fn ensure_utm_zone_for_longitude(&self, lng: f64) -> Result<CrsDefinition> {
        self.ensure_utm_zone(utm_zone_for_longitude(lng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canada::{MTM_ZONE_9_ID, UTM_CANADA, WGS84_ID};

    #[test]
    fn test_normalized_ids() {
        let definition = CrsDefinition::new(" epsg:2951 ", "+proj=longlat +datum=WGS84");
        assert_eq!(definition.id, "EPSG:2951");
    }

    #[test]
    fn test_is_geographic() {
        assert!(CrsDefinition::new("a", "+proj=longlat +datum=WGS84 +no_defs").is_geographic());
        assert!(!CrsDefinition::new("b", "+proj=utm +zone=18 +ellps=GRS80").is_geographic());
    }

    #[test]
    fn test_empty_registry() {
        let registry = CrsRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get(WGS84_ID),
            Err(Error::UnknownCrs(WGS84_ID.to_string()))
        );
    }

    #[test]
    fn test_default_registry() {
        let registry = CrsRegistry::with_defaults();
        assert_eq!(registry.len(), 2 + 2 * UTM_CANADA.len());
        assert!(registry.contains(MTM_ZONE_9_ID));
        assert!(registry.contains("epsg:26918"));
        assert!(registry.contains("EPSG:3166"));
        assert_eq!(
            registry.get("EPSG:26918").unwrap().proj_string,
            registry.get("EPSG:3166").unwrap().proj_string
        );
    }

    #[test]
    fn test_insert_last_write_wins() {
        let registry = CrsRegistry::new();
        assert!(registry
            .insert(CrsDefinition::new("X:1", "+proj=longlat +ellps=GRS80"))
            .is_none());
        let replaced = registry
            .insert(CrsDefinition::new("x:1", "+proj=longlat +datum=WGS84"))
            .unwrap();
        assert_eq!(replaced.proj_string, "+proj=longlat +ellps=GRS80");
        assert_eq!(registry.get("X:1").unwrap().proj_string, "+proj=longlat +datum=WGS84");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_invalid_definition() {
        let registry = CrsRegistry::new();
        let err = registry
            .register(CrsDefinition::new("BAD:1", "+proj=nonexistent"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { .. }));
        assert!(!registry.contains("BAD:1"));
    }

    #[test]
    fn test_ensure_utm_zone_is_cached() {
        let registry = CrsRegistry::new();
        let first = registry.ensure_utm_zone_for_longitude(-75.7).unwrap();
        assert_eq!(first.id, "EPSG:26918");
        assert_eq!(
            first.proj_string,
            "+proj=utm +zone=18 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs"
        );

        let second = registry.ensure_utm_zone(18).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_synthesized_zone_matches_seed_table() {
        let seeded = CrsRegistry::with_defaults();
        let fresh = CrsRegistry::new();
        for entry in &UTM_CANADA {
            assert_eq!(
                fresh.ensure_utm_zone(entry.zone).unwrap(),
                seeded.get(&entry.nad83_id()).unwrap()
            );
        }
        assert_eq!(fresh.ensure_utm_zone(7).unwrap().id, "EPSG:26907");
    }

    #[test]
    fn test_ensure_utm_zone_rejects_bad_longitude() {
        let registry = CrsRegistry::new();
        assert_eq!(
            registry.ensure_utm_zone_for_longitude(181.0),
            Err(Error::LongitudeOutOfRange(181.0))
        );
        assert!(registry.is_empty());
    }
}
