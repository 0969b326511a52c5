//! Value records exposed by a geodesy engine.
//!
//! These are plain named records: the engine owns their semantics, this
//! workspace only reads names and parameter values from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CrsError;

/// Kind of coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsKind {
    Geographic,
    Geocentric,
    Projected,
    Vertical,
    Compound,
    Bound,
}

impl CrsKind {
    /// Human readable type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            CrsKind::Geographic => "Geographic 2D CRS",
            CrsKind::Geocentric => "Geocentric CRS",
            CrsKind::Projected => "Projected CRS",
            CrsKind::Vertical => "Vertical CRS",
            CrsKind::Compound => "Compound CRS",
            CrsKind::Bound => "Bound CRS",
        }
    }
}

/// Well-known text dialects understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WktVersion {
    Wkt2_2015,
    #[default]
    Wkt2_2019,
    Wkt1Gdal,
}

impl WktVersion {
    pub fn is_wkt1(&self) -> bool {
        matches!(self, WktVersion::Wkt1Gdal)
    }
}

impl FromStr for WktVersion {
    type Err = CrsError;

    /// Accepts `WKT2_2015`, `WKT2_2018`, `WKT2_2019` and `WKT1_GDAL` (any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WKT2_2015" => Ok(WktVersion::Wkt2_2015),
            "WKT2_2018" | "WKT2_2019" => Ok(WktVersion::Wkt2_2019),
            "WKT1_GDAL" => Ok(WktVersion::Wkt1Gdal),
            _ => Err(CrsError::InvalidParameter {
                param: "wkt_version".to_string(),
                message: format!("unknown WKT version '{}'", s),
            }),
        }
    }
}

impl fmt::Display for WktVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WktVersion::Wkt2_2015 => "WKT2_2015",
            WktVersion::Wkt2_2019 => "WKT2_2019",
            WktVersion::Wkt1Gdal => "WKT1_GDAL",
        };
        write!(f, "{}", name)
    }
}

/// Reference ellipsoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub name: String,
    pub semi_major_metre: f64,
    /// Zero for a sphere.
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub fn new(name: impl Into<String>, semi_major_metre: f64, inverse_flattening: f64) -> Self {
        Self {
            name: name.into(),
            semi_major_metre,
            inverse_flattening,
        }
    }

    pub fn is_sphere(&self) -> bool {
        self.inverse_flattening == 0.0
    }

    pub fn semi_minor_metre(&self) -> f64 {
        if self.is_sphere() {
            self.semi_major_metre
        } else {
            self.semi_major_metre * (1.0 - 1.0 / self.inverse_flattening)
        }
    }
}

impl fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Geodetic datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub name: String,
    pub ellipsoid: Ellipsoid,
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Prime meridian, longitude in degrees from Greenwich.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimeMeridian {
    pub name: String,
    pub longitude: f64,
}

impl PrimeMeridian {
    pub fn greenwich() -> Self {
        Self {
            name: "Greenwich".to_string(),
            longitude: 0.0,
        }
    }
}

impl fmt::Display for PrimeMeridian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single coordinate system axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInfo {
    pub name: String,
    pub abbrev: String,
    pub direction: String,
    pub unit_name: String,
}

impl AxisInfo {
    pub fn new(name: &str, abbrev: &str, direction: &str, unit_name: &str) -> Self {
        Self {
            name: name.to_string(),
            abbrev: abbrev.to_string(),
            direction: direction.to_string(),
            unit_name: unit_name.to_string(),
        }
    }
}

impl fmt::Display for AxisInfo {
    /// Formats as `Lon[east]: Longitude (degree)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} ({})",
            self.abbrev, self.direction, self.name, self.unit_name
        )
    }
}

/// Coordinate system: its kind (`ellipsoidal`, `Cartesian`, `vertical`) and axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub kind: String,
    pub axes: Vec<AxisInfo>,
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationParameter {
    pub name: String,
    pub value: f64,
}

/// A named coordinate operation (conversion or transformation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateOperation {
    pub name: String,
    pub method_name: String,
    pub params: Vec<OperationParameter>,
}

impl CoordinateOperation {
    /// Value of the named parameter, if present.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }
}

impl fmt::Display for CoordinateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Area of use: a name and west/south/east/north bounds in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOfUse {
    pub name: String,
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfUse {
    pub fn new(name: &str, west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            name: name.to_string(),
            west,
            south,
            east,
            north,
        }
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.west, self.south, self.east, self.north)
    }
}

impl fmt::Display for AreaOfUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- name: {}\n- bounds: ({}, {}, {}, {})",
            self.name, self.west, self.south, self.east, self.north
        )
    }
}
