//! PROJ keyword definitions (`+proj=... +key=value +flag`).

use crs_common::{CrsError, CrsResult, Datum, Ellipsoid, PrimeMeridian};

use crate::model::CrsModel;
use crate::registry::{self, KnownCrs};

/// Ordered `key[=value]` tokens of a PROJ keyword definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjString {
    tokens: Vec<(String, Option<String>)>,
}

impl ProjString {
    /// Split on whitespace and the first `=` of each token, dropping leading `+`.
    pub fn parse(text: &str) -> Self {
        let tokens = text
            .split_whitespace()
            .filter_map(|token| {
                let token = token.trim_start_matches('+');
                if token.is_empty() {
                    return None;
                }
                Some(match token.split_once('=') {
                    Some((key, value)) => (key.to_string(), Some(value.to_string())),
                    None => (token.to_string(), None),
                })
            })
            .collect();
        Self { tokens }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.tokens.iter().any(|(k, _)| k == key)
    }

    /// Value of `key`; `None` when absent or a bare flag.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(|v| v.parse::<f64>().ok())
    }

    /// Append a token, or replace the value of an existing key in place.
    pub fn push(&mut self, key: &str, value: Option<String>) {
        match self.tokens.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.tokens.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|(k, _)| k != key);
        self.tokens.len() != before
    }

    /// Copy without the given keys.
    pub fn without(&self, keys: &[&str]) -> Self {
        Self {
            tokens: self
                .tokens
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Copy keeping only the given keys, in their original order.
    pub fn only(&self, keys: &[&str]) -> Self {
        Self {
            tokens: self
                .tokens
                .iter()
                .filter(|(k, _)| keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn extend(&mut self, other: &ProjString) {
        for (key, value) in other.iter() {
            self.push(key, value.map(str::to_string));
        }
    }

    /// Render as `+key=value +flag`.
    pub fn render(&self) -> String {
        self.tokens
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("+{}={}", key, value),
                None => format!("+{}", key),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Same parameters regardless of order, with numbers compared by value.
    ///
    /// Keys that never change the meaning of a definition are ignored.
    pub fn equivalent(&self, other: &ProjString) -> bool {
        const IGNORED: &[&str] = &["no_defs", "type", "wktext", "units"];
        let left = self.without(IGNORED);
        let right = other.without(IGNORED);
        if left.tokens.len() != right.tokens.len() {
            return false;
        }
        let same = left.iter().all(|(key, value)| {
            right.has(key)
                && match (value, right.value(key)) {
                    (None, None) => true,
                    (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
                        (Ok(x), Ok(y)) => x == y,
                        _ => a.eq_ignore_ascii_case(b),
                    },
                    _ => false,
                }
        });
        same
    }
}

/// PROJ names that describe a geographic CRS.
pub const LONLAT_NAMES: &[&str] = &["longlat", "latlong", "lonlat", "latlon"];

/// Keys that belong to the geodetic datum and ellipsoid.
pub const DATUM_KEYS: &[&str] = &["datum", "ellps", "a", "b", "rf", "f", "R", "pm"];

/// Build a model from a keyword definition.
pub fn read(text: &str) -> CrsResult<CrsModel> {
    let mut ps = ProjString::parse(text);
    ps.remove("type");

    if let Some(init) = ps.value("init") {
        let (auth, code) = init
            .split_once(':')
            .ok_or_else(|| CrsError::InvalidProj(format!("malformed +init={}", init)))?;
        let known = KnownCrs::from_authority(auth, code)
            .ok_or_else(|| CrsError::Engine(format!("unknown init file entry '{}'", init)))?;
        return CrsModel::from_registry(known);
    }

    model_from_tokens(ps)
}

/// Build a model from parsed tokens, keeping them as its PROJ definition.
pub(crate) fn model_from_tokens(ps: ProjString) -> CrsResult<CrsModel> {
    let proj_name = ps
        .value("proj")
        .ok_or_else(|| CrsError::InvalidProj("missing +proj".to_string()))?
        .to_string();

    if ps.has("towgs84") {
        let source = model_from_tokens(ps.without(&["towgs84"]))?;
        let values = parse_towgs84(ps.value("towgs84").unwrap_or_default())?;
        let mut bound = CrsModel::bound_to_wgs84(source, &values)?;
        bound.proj = Some(ps);
        return Ok(bound);
    }

    let datum = datum_from(&ps)?;
    let pm = prime_meridian_from(&ps)?;

    let mut model = if LONLAT_NAMES.contains(&proj_name.as_str()) {
        CrsModel::geographic("unknown", datum, pm, None)
    } else if proj_name == "ob_tran" {
        let operation = crate::methods::operation_from_proj(&ps)?;
        CrsModel::rotated("unknown", datum, pm, operation)
    } else if proj_name == "geocent" {
        CrsModel::geocentric("unknown", datum, pm)
    } else {
        let base = CrsModel::geographic("unknown", datum, pm, None);
        let mut base_ps = ps.only(DATUM_KEYS);
        base_ps.tokens.insert(0, ("proj".to_string(), Some("longlat".to_string())));
        base_ps.push("no_defs", None);
        let base = base.with_proj(base_ps);
        let operation = crate::methods::operation_from_proj(&ps)?;
        CrsModel::projected("unknown", base, operation, None)
    };
    model.proj = Some(ps);
    Ok(model)
}

fn parse_towgs84(text: &str) -> CrsResult<Vec<f64>> {
    let values: Result<Vec<f64>, _> = text.split(',').map(|v| v.trim().parse::<f64>()).collect();
    match values {
        Ok(values) if values.len() == 3 || values.len() == 7 => Ok(values),
        _ => Err(CrsError::InvalidProj(format!(
            "+towgs84 expects 3 or 7 numbers, got '{}'",
            text
        ))),
    }
}

fn ellipsoid_from(ps: &ProjString) -> CrsResult<Ellipsoid> {
    if let Some(radius) = ps.number("R") {
        return Ok(Ellipsoid::new("unknown", radius, 0.0));
    }
    if let Some(a) = ps.number("a") {
        let rf = if let Some(rf) = ps.number("rf") {
            rf
        } else if let Some(b) = ps.number("b") {
            if a == b {
                0.0
            } else {
                a / (a - b)
            }
        } else if let Some(f) = ps.number("f") {
            if f == 0.0 {
                0.0
            } else {
                1.0 / f
            }
        } else {
            0.0
        };
        return Ok(Ellipsoid::new("unknown", a, rf));
    }
    if let Some(key) = ps.value("ellps") {
        return registry::ellipsoid_by_key(key)
            .map(|e| e.to_ellipsoid())
            .ok_or_else(|| CrsError::Engine(format!("unknown ellipsoid '{}'", key)));
    }
    if let Some(key) = ps.value("datum") {
        if let Some(datum) = registry::datum_by_key(key) {
            if let Some(e) = registry::ellipsoid_by_key(datum.ellipsoid_key) {
                return Ok(e.to_ellipsoid());
            }
        }
    }
    // PROJ falls back to GRS 1980
    registry::ellipsoid_by_key("GRS80")
        .map(|e| e.to_ellipsoid())
        .ok_or_else(|| CrsError::Engine("missing default ellipsoid".to_string()))
}

fn datum_from(ps: &ProjString) -> CrsResult<Datum> {
    let ellipsoid = ellipsoid_from(ps)?;
    if let Some(key) = ps.value("datum") {
        let def = registry::datum_by_key(key)
            .ok_or_else(|| CrsError::Engine(format!("unknown datum '{}'", key)))?;
        return Ok(Datum {
            name: def.name.to_string(),
            ellipsoid,
        });
    }
    let name = if ellipsoid.name == "unknown" {
        "unknown".to_string()
    } else {
        format!("Unknown based on {} ellipsoid", ellipsoid.name)
    };
    Ok(Datum { name, ellipsoid })
}

fn prime_meridian_from(ps: &ProjString) -> CrsResult<PrimeMeridian> {
    let Some(pm) = ps.value("pm") else {
        return Ok(PrimeMeridian::greenwich());
    };
    if let Ok(longitude) = pm.parse::<f64>() {
        return Ok(PrimeMeridian {
            name: if longitude == 0.0 {
                "Greenwich".to_string()
            } else {
                "unknown".to_string()
            },
            longitude,
        });
    }
    registry::prime_meridian_by_name(pm)
        .map(|(name, longitude)| PrimeMeridian {
            name: name.to_string(),
            longitude,
        })
        .ok_or_else(|| CrsError::Engine(format!("unknown prime meridian '{}'", pm)))
}

/// Geodetic tokens (`datum`, `ellps` or explicit axes, `pm`) describing a datum.
pub(crate) fn geodetic_tokens(datum: &Datum, pm: &PrimeMeridian) -> ProjString {
    let mut ps = ProjString::default();
    if let Some(def) = registry::datum_by_name(&datum.name) {
        ps.push("datum", Some(def.key.to_string()));
    } else if let Some(def) = registry::ellipsoid_by_name(&datum.ellipsoid.name) {
        ps.push("ellps", Some(def.key.to_string()));
    } else if datum.ellipsoid.is_sphere() {
        ps.push(
            "R",
            Some(crate::methods::format_number(datum.ellipsoid.semi_major_metre)),
        );
    } else {
        ps.push(
            "a",
            Some(crate::methods::format_number(datum.ellipsoid.semi_major_metre)),
        );
        ps.push(
            "rf",
            Some(crate::methods::format_number(datum.ellipsoid.inverse_flattening)),
        );
    }
    if pm.longitude != 0.0 {
        ps.push("pm", Some(crate::methods::format_number(pm.longitude)));
    }
    ps
}
