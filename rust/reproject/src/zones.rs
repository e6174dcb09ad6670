// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UTM zone arithmetic and synthesized zone definitions

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

pub const MIN_ZONE: u8 = 1;
pub const MAX_ZONE: u8 = 60;

/// Northern-hemisphere UTM zone (1..=60) containing `lng`.
///
/// Zones are 6° wide starting at -180°. Longitude 180° belongs to zone 60.
pub fn utm_zone_for_longitude(lng: f64) -> Result<u8> {
    if !(-180.0..=180.0).contains(&lng) {
        // also rejects NaN
        return Err(Error::LongitudeOutOfRange(lng));
    }
    let zone = ((lng + 180.0) / 6.0).floor() as u8 + 1;
    Ok(zone.min(MAX_ZONE))
}

/// PROJ.4 definition for a northern UTM zone on NAD83
pub fn utm_definition(zone: u8) -> Result<String> {
    check_zone(zone)?;
    Ok(format!(
        "+proj=utm +zone={} +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
        zone
    ))
}

/// Registry identifier of a synthesized zone, `EPSG:269` + two-digit zone
pub fn utm_crs_id(zone: u8) -> Result<String> {
    check_zone(zone)?;
    Ok(format!("EPSG:269{:02}", zone))
}

#[inline]
fn check_zone(zone: u8) -> Result<()> {
    if (MIN_ZONE..=MAX_ZONE).contains(&zone) {
        Ok(())
    } else {
        Err(Error::InvalidZone(zone))
    }
}

/// Memoized zone definitions, so repeated lookups share one string
#[derive(Debug, Default)]
pub struct UtmZoneCache {
    zones: RwLock<FxHashMap<u8, Arc<str>>>,
}

impl UtmZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(&self, zone: u8) -> Result<Arc<str>> {
        let cached = self
            .zones
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&zone)
            .cloned();
        if let Some(cached) = cached {
            return Ok(cached);
        }

        let synthesized: Arc<str> = utm_definition(zone)?.into();
        tracing::debug!(zone, "Synthesized UTM zone definition");

        let mut zones = self.zones.write().unwrap_or_else(PoisonError::into_inner);
        Ok(zones.entry(zone).or_insert(synthesized).clone())
    }

    pub fn len(&self) -> usize {
        self.zones
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
