//! Built-in registry of well-known CRS codes, ellipsoids and datums.

use crs_common::{AreaOfUse, Ellipsoid};
use once_cell::sync::Lazy;
use std::fmt;

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// X (longitude/easting), Y (latitude/northing)
    XY,
    /// Y (latitude/northing), X (longitude/easting)
    LatLon,
}

/// Well-known CRS codes resolvable by the built-in engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownCrs {
    /// WGS84 Geographic (lat/lon in degrees)
    Epsg4326,
    /// NAD83 Geographic
    Epsg4269,
    /// NAD27 Geographic
    Epsg4267,
    /// Web Mercator (meters)
    Epsg3857,
    /// NAD83 / Conus Albers
    Epsg5070,
    /// Polar Stereographic North
    Epsg3413,
    /// Polar Stereographic South
    Epsg3031,
    /// WGS84 Geographic with lon/lat axis order
    Crs84,
    /// WGS 84 / UTM zone N, northern hemisphere (EPSG:326NN)
    UtmNorth(u8),
    /// WGS 84 / UTM zone N, southern hemisphere (EPSG:327NN)
    UtmSouth(u8),
}

impl KnownCrs {
    /// Look up an authority name and code (case-insensitive authority).
    ///
    /// Accepts `EPSG` codes and `OGC`/`CRS` aliases for CRS84.
    pub fn from_authority(auth_name: &str, code: &str) -> Option<Self> {
        let auth = auth_name.trim().to_uppercase();
        let code = code.trim();
        match auth.as_str() {
            "EPSG" => {
                let code: u32 = code.parse().ok()?;
                Self::from_epsg(code)
            }
            "OGC" | "CRS" => match code.to_uppercase().as_str() {
                "CRS84" | "84" => Some(KnownCrs::Crs84),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 => Some(KnownCrs::Epsg4326),
            4269 => Some(KnownCrs::Epsg4269),
            4267 => Some(KnownCrs::Epsg4267),
            3857 | 900913 => Some(KnownCrs::Epsg3857),
            5070 => Some(KnownCrs::Epsg5070),
            3413 => Some(KnownCrs::Epsg3413),
            3031 => Some(KnownCrs::Epsg3031),
            32601..=32660 => Some(KnownCrs::UtmNorth((code - 32600) as u8)),
            32701..=32760 => Some(KnownCrs::UtmSouth((code - 32700) as u8)),
            _ => None,
        }
    }

    /// Every registry entry, in lookup priority order.
    pub fn all() -> impl Iterator<Item = KnownCrs> {
        [
            KnownCrs::Epsg4326,
            KnownCrs::Epsg4269,
            KnownCrs::Epsg4267,
            KnownCrs::Epsg3857,
            KnownCrs::Epsg5070,
            KnownCrs::Epsg3413,
            KnownCrs::Epsg3031,
            KnownCrs::Crs84,
        ]
        .into_iter()
        .chain((1..=60).map(KnownCrs::UtmNorth))
        .chain((1..=60).map(KnownCrs::UtmSouth))
    }

    /// Authority name and code.
    pub fn authority(&self) -> (&'static str, String) {
        match self {
            KnownCrs::Epsg4326 => ("EPSG", "4326".to_string()),
            KnownCrs::Epsg4269 => ("EPSG", "4269".to_string()),
            KnownCrs::Epsg4267 => ("EPSG", "4267".to_string()),
            KnownCrs::Epsg3857 => ("EPSG", "3857".to_string()),
            KnownCrs::Epsg5070 => ("EPSG", "5070".to_string()),
            KnownCrs::Epsg3413 => ("EPSG", "3413".to_string()),
            KnownCrs::Epsg3031 => ("EPSG", "3031".to_string()),
            KnownCrs::Crs84 => ("OGC", "CRS84".to_string()),
            KnownCrs::UtmNorth(zone) => ("EPSG", format!("{}", 32600 + *zone as u32)),
            KnownCrs::UtmSouth(zone) => ("EPSG", format!("{}", 32700 + *zone as u32)),
        }
    }

    pub fn name(&self) -> String {
        match self {
            KnownCrs::Epsg4326 => "WGS 84".to_string(),
            KnownCrs::Epsg4269 => "NAD83".to_string(),
            KnownCrs::Epsg4267 => "NAD27".to_string(),
            KnownCrs::Epsg3857 => "WGS 84 / Pseudo-Mercator".to_string(),
            KnownCrs::Epsg5070 => "NAD83 / Conus Albers".to_string(),
            KnownCrs::Epsg3413 => "WGS 84 / NSIDC Sea Ice Polar Stereographic North".to_string(),
            KnownCrs::Epsg3031 => "WGS 84 / Antarctic Polar Stereographic".to_string(),
            KnownCrs::Crs84 => "WGS 84 (CRS84)".to_string(),
            KnownCrs::UtmNorth(zone) => format!("WGS 84 / UTM zone {}N", zone),
            KnownCrs::UtmSouth(zone) => format!("WGS 84 / UTM zone {}S", zone),
        }
    }

    /// PROJ keyword definition of this CRS.
    pub fn definition(&self) -> String {
        match self {
            KnownCrs::Epsg4326 | KnownCrs::Crs84 => "+proj=longlat +datum=WGS84 +no_defs".to_string(),
            KnownCrs::Epsg4269 => "+proj=longlat +datum=NAD83 +no_defs".to_string(),
            KnownCrs::Epsg4267 => "+proj=longlat +datum=NAD27 +no_defs".to_string(),
            KnownCrs::Epsg3857 => "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +wktext +no_defs".to_string(),
            KnownCrs::Epsg5070 => "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +datum=NAD83 +units=m +no_defs".to_string(),
            KnownCrs::Epsg3413 => "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs".to_string(),
            KnownCrs::Epsg3031 => "+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs".to_string(),
            KnownCrs::UtmNorth(zone) => format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", zone),
            KnownCrs::UtmSouth(zone) => format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs", zone),
        }
    }

    /// Get the valid area for this CRS.
    pub fn area_of_use(&self) -> AreaOfUse {
        match self {
            KnownCrs::Epsg4326 | KnownCrs::Crs84 => {
                AreaOfUse::new("World.", -180.0, -90.0, 180.0, 90.0)
            }
            KnownCrs::Epsg4269 => AreaOfUse::new(
                "North America - onshore and offshore: Canada, Puerto Rico, United States (USA), US Virgin Islands",
                167.65,
                14.92,
                -40.73,
                86.45,
            ),
            KnownCrs::Epsg4267 => AreaOfUse::new(
                "North and central America: Antigua and Barbuda - onshore. Bahamas - onshore plus offshore over internal continental shelf only. Canada, United States (USA), Mexico",
                167.65,
                7.15,
                -47.74,
                83.17,
            ),
            // Web Mercator: approx ±85.06° latitude
            KnownCrs::Epsg3857 => {
                AreaOfUse::new("World between 85.06°S and 85.06°N.", -180.0, -85.06, 180.0, 85.06)
            }
            KnownCrs::Epsg5070 => AreaOfUse::new(
                "United States (USA) - CONUS onshore",
                -124.79,
                24.41,
                -66.91,
                49.38,
            ),
            KnownCrs::Epsg3413 => {
                AreaOfUse::new("Northern hemisphere - north of 30°N", -180.0, 30.0, 180.0, 90.0)
            }
            KnownCrs::Epsg3031 => {
                AreaOfUse::new("Antarctica.", -180.0, -90.0, 180.0, -60.0)
            }
            KnownCrs::UtmNorth(zone) => {
                let west = -186.0 + 6.0 * *zone as f64;
                AreaOfUse::new(
                    &format!(
                        "Between {}°E and {}°E, northern hemisphere between equator and 84°N, onshore and offshore.",
                        west,
                        west + 6.0
                    ),
                    west,
                    0.0,
                    west + 6.0,
                    84.0,
                )
            }
            KnownCrs::UtmSouth(zone) => {
                let west = -186.0 + 6.0 * *zone as f64;
                AreaOfUse::new(
                    &format!(
                        "Between {}°E and {}°E, southern hemisphere between 80°S and equator, onshore and offshore.",
                        west,
                        west + 6.0
                    ),
                    west,
                    -80.0,
                    west + 6.0,
                    0.0,
                )
            }
        }
    }

    /// Axis order as registered by the authority.
    ///
    /// EPSG geographic CRSs are latitude first; CRS84 and projected CRSs are
    /// easting/longitude first.
    pub fn axis_order(&self) -> AxisOrder {
        match self {
            KnownCrs::Epsg4326 | KnownCrs::Epsg4269 | KnownCrs::Epsg4267 => AxisOrder::LatLon,
            _ => AxisOrder::XY,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(
            self,
            KnownCrs::Epsg4326 | KnownCrs::Epsg4269 | KnownCrs::Epsg4267 | KnownCrs::Crs84
        )
    }
}

impl fmt::Display for KnownCrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (auth, code) = self.authority();
        write!(f, "{}:{}", auth, code)
    }
}

/// Parse an authority string: `AUTH:CODE` or `urn:ogc:def:crs:AUTH:[VERSION]:CODE`.
pub fn parse_authority_string(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let lower = text.to_lowercase();
    if lower.starts_with("urn:ogc:def:crs:") {
        let parts: Vec<&str> = text.split(':').collect();
        // urn:ogc:def:crs:EPSG::4326 → ["urn","ogc","def","crs","EPSG","","4326"]
        if parts.len() >= 6 {
            let auth = parts[4];
            let code = parts[parts.len() - 1];
            if !auth.is_empty() && !code.is_empty() {
                return Some((auth.to_string(), code.to_string()));
            }
        }
        return None;
    }
    let (auth, code) = text.split_once(':')?;
    if auth.is_empty() || code.is_empty() || code.contains(':') {
        return None;
    }
    Some((auth.to_string(), code.to_string()))
}

// ============================================================================
// Ellipsoids and datums
// ============================================================================

/// Ellipsoid known by PROJ keyword (`+ellps=`).
#[derive(Debug, Clone, Copy)]
pub struct EllipsoidDef {
    pub key: &'static str,
    pub name: &'static str,
    pub semi_major: f64,
    pub inverse_flattening: f64,
}

impl EllipsoidDef {
    pub fn to_ellipsoid(&self) -> Ellipsoid {
        Ellipsoid::new(self.name, self.semi_major, self.inverse_flattening)
    }
}

pub static ELLIPSOIDS: [EllipsoidDef; 7] = [
    EllipsoidDef { key: "WGS84", name: "WGS 84", semi_major: 6378137.0, inverse_flattening: 298.257223563 },
    EllipsoidDef { key: "GRS80", name: "GRS 1980", semi_major: 6378137.0, inverse_flattening: 298.257222101 },
    EllipsoidDef { key: "clrk66", name: "Clarke 1866", semi_major: 6378206.4, inverse_flattening: 294.978698213898 },
    EllipsoidDef { key: "intl", name: "International 1924", semi_major: 6378388.0, inverse_flattening: 297.0 },
    EllipsoidDef { key: "bessel", name: "Bessel 1841", semi_major: 6377397.155, inverse_flattening: 299.1528128 },
    EllipsoidDef { key: "krass", name: "Krassowsky 1940", semi_major: 6378245.0, inverse_flattening: 298.3 },
    EllipsoidDef { key: "sphere", name: "Normal Sphere (r=6370997)", semi_major: 6370997.0, inverse_flattening: 0.0 },
];

/// Datum known by PROJ keyword (`+datum=`).
#[derive(Debug, Clone, Copy)]
pub struct DatumDef {
    pub key: &'static str,
    pub name: &'static str,
    pub ellipsoid_key: &'static str,
}

pub static DATUMS: [DatumDef; 3] = [
    DatumDef { key: "WGS84", name: "World Geodetic System 1984", ellipsoid_key: "WGS84" },
    DatumDef { key: "NAD83", name: "North American Datum 1983", ellipsoid_key: "GRS80" },
    DatumDef { key: "NAD27", name: "North American Datum 1927", ellipsoid_key: "clrk66" },
];

/// Named prime meridians accepted by `+pm=`.
pub static PRIME_MERIDIANS: [(&str, &str, f64); 4] = [
    ("greenwich", "Greenwich", 0.0),
    ("paris", "Paris", 2.33722917),
    ("ferro", "Ferro", -17.6666667),
    ("madrid", "Madrid", -3.687938888889),
];

pub fn ellipsoid_by_key(key: &str) -> Option<&'static EllipsoidDef> {
    ELLIPSOIDS.iter().find(|e| e.key.eq_ignore_ascii_case(key))
}

pub fn datum_by_key(key: &str) -> Option<&'static DatumDef> {
    DATUMS.iter().find(|d| d.key.eq_ignore_ascii_case(key))
}

/// Look up an ellipsoid by its descriptive name (`WGS 84`, `WGS_1984`, ...).
pub fn ellipsoid_by_name(name: &str) -> Option<&'static EllipsoidDef> {
    let wanted = normalize_name(name);
    ELLIPSOIDS.iter().find(|e| {
        normalize_name(e.name) == wanted || normalize_name(e.key) == wanted
    })
}

/// Look up a datum by its descriptive name, tolerating WKT1 spellings
/// such as `WGS_1984` or `D_North_American_1983`.
pub fn datum_by_name(name: &str) -> Option<&'static DatumDef> {
    let wanted = normalize_name(name);
    let wanted = wanted.strip_prefix("d ").unwrap_or(&wanted).to_string();
    DATUMS.iter().find(|d| {
        let full = normalize_name(d.name);
        full == wanted
            || normalize_name(d.key) == wanted
            || WKT1_DATUM_ALIASES
                .iter()
                .any(|(alias, key)| *key == d.key && normalize_name(alias) == wanted)
    })
}

static WKT1_DATUM_ALIASES: [(&str, &str); 4] = [
    ("WGS_1984", "WGS84"),
    ("North_American_1983", "NAD83"),
    ("North_American_Datum_1983", "NAD83"),
    ("North_American_Datum_1927", "NAD27"),
];

pub fn prime_meridian_by_name(name: &str) -> Option<(&'static str, f64)> {
    PRIME_MERIDIANS
        .iter()
        .find(|(key, _, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, label, lon)| (*label, *lon))
}

fn normalize_name(name: &str) -> String {
    name.trim().replace('_', " ").to_lowercase()
}

/// Registry definitions, parsed once, used for equivalence lookups.
pub(crate) static DEFINITIONS: Lazy<Vec<(KnownCrs, crate::keyword::ProjString)>> = Lazy::new(|| {
    KnownCrs::all()
        .map(|known| (known, crate::keyword::ProjString::parse(&known.definition())))
        .collect()
});
