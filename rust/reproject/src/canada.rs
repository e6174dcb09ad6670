// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seed CRS table
//!
//! Canadian UTM zones 7N to 22N with their NAD83 and NAD83(CSRS) EPSG codes,
//! the MTM zone 9 definition used for Ottawa-area models, and WGS84.

use crate::crs::CrsDefinition;

/// WGS84 geographic (longitude, latitude in degrees)
pub const WGS84_ID: &str = "EPSG:4326";
pub const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// NAD83(CSRS) / MTM zone 9 (Ontario/Quebec)
pub const MTM_ZONE_9_ID: &str = "EPSG:2951";
pub const MTM_ZONE_9_PROJ: &str = "+proj=tmerc +lat_0=0 +lon_0=-76.5 +k=0.9999 +x_0=304800 +y_0=0 +ellps=GRS80 +towgs84=-0.991,1.9072,0.5129,-1.25033e-07,-4.6785e-08,-5.6529e-08,0 +units=m +no_defs +type=crs";

/// One row of the Canadian UTM table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmZoneEntry {
    pub zone: u8,
    pub utm_zone: &'static str,
    /// Western bound, degrees west as published
    pub min_lng: f64,
    /// Eastern bound, degrees west as published
    pub max_lng: f64,
    pub provinces_territories: &'static str,
    pub epsg_nad83: u32,
    pub epsg_nad83_csrs: u32,
    pub proj4: &'static str,
}

impl UtmZoneEntry {
    pub fn nad83_id(&self) -> String {
        format!("EPSG:{}", self.epsg_nad83)
    }

    pub fn nad83_csrs_id(&self) -> String {
        format!("EPSG:{}", self.epsg_nad83_csrs)
    }
}

pub static UTM_CANADA: [UtmZoneEntry; 16] = [
    UtmZoneEntry {
        zone: 7,
        utm_zone: "7N",
        min_lng: 144.0,
        max_lng: 138.0,
        provinces_territories: "Yukon (westernmost part)",
        epsg_nad83: 26907,
        epsg_nad83_csrs: 3155,
        proj4: "+proj=utm +zone=7 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 8,
        utm_zone: "8N",
        min_lng: 138.0,
        max_lng: 132.0,
        provinces_territories: "Yukon, Northwest Territories",
        epsg_nad83: 26908,
        epsg_nad83_csrs: 3156,
        proj4: "+proj=utm +zone=8 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 9,
        utm_zone: "9N",
        min_lng: 132.0,
        max_lng: 126.0,
        provinces_territories: "British Columbia, Yukon, NWT",
        epsg_nad83: 26909,
        epsg_nad83_csrs: 3157,
        proj4: "+proj=utm +zone=9 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 10,
        utm_zone: "10N",
        min_lng: 126.0,
        max_lng: 120.0,
        provinces_territories: "British Columbia, NWT, Yukon",
        epsg_nad83: 26910,
        epsg_nad83_csrs: 3158,
        proj4: "+proj=utm +zone=10 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 11,
        utm_zone: "11N",
        min_lng: 120.0,
        max_lng: 114.0,
        provinces_territories: "Alberta, British Columbia, NWT",
        epsg_nad83: 26911,
        epsg_nad83_csrs: 3159,
        proj4: "+proj=utm +zone=11 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 12,
        utm_zone: "12N",
        min_lng: 114.0,
        max_lng: 108.0,
        provinces_territories: "Alberta, Saskatchewan, NWT",
        epsg_nad83: 26912,
        epsg_nad83_csrs: 3160,
        proj4: "+proj=utm +zone=12 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 13,
        utm_zone: "13N",
        min_lng: 108.0,
        max_lng: 102.0,
        provinces_territories: "Saskatchewan, Manitoba, NWT",
        epsg_nad83: 26913,
        epsg_nad83_csrs: 3161,
        proj4: "+proj=utm +zone=13 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 14,
        utm_zone: "14N",
        min_lng: 102.0,
        max_lng: 96.0,
        provinces_territories: "Manitoba, Nunavut, Saskatchewan",
        epsg_nad83: 26914,
        epsg_nad83_csrs: 3162,
        proj4: "+proj=utm +zone=14 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 15,
        utm_zone: "15N",
        min_lng: 96.0,
        max_lng: 90.0,
        provinces_territories: "Manitoba, Ontario, Nunavut",
        epsg_nad83: 26915,
        epsg_nad83_csrs: 3163,
        proj4: "+proj=utm +zone=15 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 16,
        utm_zone: "16N",
        min_lng: 90.0,
        max_lng: 84.0,
        provinces_territories: "Ontario, Nunavut",
        epsg_nad83: 26916,
        epsg_nad83_csrs: 3164,
        proj4: "+proj=utm +zone=16 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 17,
        utm_zone: "17N",
        min_lng: 84.0,
        max_lng: 78.0,
        provinces_territories: "Ontario, Quebec, Nunavut",
        epsg_nad83: 26917,
        epsg_nad83_csrs: 3165,
        proj4: "+proj=utm +zone=17 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 18,
        utm_zone: "18N",
        min_lng: 78.0,
        max_lng: 72.0,
        provinces_territories: "Quebec, Nunavut",
        epsg_nad83: 26918,
        epsg_nad83_csrs: 3166,
        proj4: "+proj=utm +zone=18 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 19,
        utm_zone: "19N",
        min_lng: 72.0,
        max_lng: 66.0,
        provinces_territories: "Quebec, Labrador, Nunavut",
        epsg_nad83: 26919,
        epsg_nad83_csrs: 3167,
        proj4: "+proj=utm +zone=19 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 20,
        utm_zone: "20N",
        min_lng: 66.0,
        max_lng: 60.0,
        provinces_territories: "Quebec, Labrador, Newfoundland",
        epsg_nad83: 26920,
        epsg_nad83_csrs: 3168,
        proj4: "+proj=utm +zone=20 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 21,
        utm_zone: "21N",
        min_lng: 60.0,
        max_lng: 54.0,
        provinces_territories: "Newfoundland and Labrador",
        epsg_nad83: 26921,
        epsg_nad83_csrs: 3169,
        proj4: "+proj=utm +zone=21 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
    UtmZoneEntry {
        zone: 22,
        utm_zone: "22N",
        min_lng: 54.0,
        max_lng: 48.0,
        provinces_territories: "Newfoundland and Labrador (easternmost part)",
        epsg_nad83: 26922,
        epsg_nad83_csrs: 3170,
        proj4: "+proj=utm +zone=22 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs",
    },
];

/// Table row whose NAD83 or NAD83(CSRS) code matches
pub fn utm_zone_entry_for_epsg(code: u32) -> Option<&'static UtmZoneEntry> {
    UTM_CANADA
        .iter()
        .find(|entry| entry.epsg_nad83 == code || entry.epsg_nad83_csrs == code)
}

pub fn utm_zone_entry_for_zone(zone: u8) -> Option<&'static UtmZoneEntry> {
    UTM_CANADA.iter().find(|entry| entry.zone == zone)
}

/// Every definition the default registry starts with
pub fn seed_definitions() -> impl Iterator<Item = CrsDefinition> {
    let fixed = [
        CrsDefinition::new(WGS84_ID, WGS84_PROJ),
        CrsDefinition::new(MTM_ZONE_9_ID, MTM_ZONE_9_PROJ),
    ];

    let zones = UTM_CANADA.iter().flat_map(|entry| {
        [
            CrsDefinition::new(entry.nad83_id(), entry.proj4),
            CrsDefinition::new(entry.nad83_csrs_id(), entry.proj4),
        ]
    });

    fixed.into_iter().chain(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_contiguous() {
        for (entry, next) in UTM_CANADA.iter().zip(UTM_CANADA.iter().skip(1)) {
            assert_eq!(next.zone, entry.zone + 1);
            assert_eq!(next.min_lng, entry.max_lng);
            assert_eq!(next.epsg_nad83, entry.epsg_nad83 + 1);
            assert_eq!(next.epsg_nad83_csrs, entry.epsg_nad83_csrs + 1);
        }
        assert_eq!(UTM_CANADA[0].utm_zone, "7N");
        assert_eq!(UTM_CANADA[15].utm_zone, "22N");
    }

    #[test]
    fn test_labels_match_zone_numbers() {
        for entry in &UTM_CANADA {
            assert_eq!(entry.utm_zone, format!("{}N", entry.zone));
            assert!(entry.proj4.contains(&format!("+zone={} ", entry.zone)));
        }
    }

    #[test]
    fn test_lookup_by_epsg() {
        let entry = utm_zone_entry_for_epsg(26918).unwrap();
        assert_eq!(entry.utm_zone, "18N");
        assert_eq!(entry.provinces_territories, "Quebec, Nunavut");
        assert_eq!(utm_zone_entry_for_epsg(3166), Some(entry));
        assert!(utm_zone_entry_for_epsg(2951).is_none());
        assert_eq!(utm_zone_entry_for_zone(9).map(|e| e.epsg_nad83), Some(26909));
    }

    #[test]
    fn test_seed_definitions() {
        let seeds: Vec<_> = seed_definitions().collect();
        assert_eq!(seeds.len(), 2 + 2 * UTM_CANADA.len());
        assert!(seeds.iter().any(|d| d.id == "EPSG:3155" && d.proj_string.contains("+zone=7 ")));
    }
}
