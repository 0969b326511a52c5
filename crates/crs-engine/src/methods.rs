//! Projection method catalogue: PROJ projection names on one side, EPSG and
//! WKT1 method/parameter names on the other.

use crs_common::{CoordinateOperation, CrsError, CrsResult, OperationParameter};

use crate::keyword::ProjString;

/// One parameter of a projection method.
#[derive(Debug, Clone, Copy)]
pub struct MethodParam {
    pub proj_key: &'static str,
    pub epsg_name: &'static str,
    pub wkt1_name: &'static str,
    pub default: f64,
}

/// A projection method with an EPSG name.
#[derive(Debug, Clone, Copy)]
pub struct MethodDef {
    pub proj_name: &'static str,
    pub method_name: &'static str,
    pub wkt1_name: &'static str,
    /// PROJ parameter that selects this variant when present.
    pub requires: Option<&'static str>,
    /// Only applies when the origin latitude is a pole.
    pub polar: bool,
    pub params: &'static [MethodParam],
}

const fn p(
    proj_key: &'static str,
    epsg_name: &'static str,
    wkt1_name: &'static str,
    default: f64,
) -> MethodParam {
    MethodParam {
        proj_key,
        epsg_name,
        wkt1_name,
        default,
    }
}

/// Variants with a `requires` key come before the fallback of the same
/// projection.
pub static METHODS: &[MethodDef] = &[
    MethodDef {
        proj_name: "tmerc",
        method_name: "Transverse Mercator",
        wkt1_name: "Transverse_Mercator",
        requires: None,
        polar: false,
        params: &[
            p("lat_0", "Latitude of natural origin", "latitude_of_origin", 0.0),
            p("lon_0", "Longitude of natural origin", "central_meridian", 0.0),
            p("k_0", "Scale factor at natural origin", "scale_factor", 1.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "lcc",
        method_name: "Lambert Conic Conformal (2SP)",
        wkt1_name: "Lambert_Conformal_Conic_2SP",
        requires: Some("lat_2"),
        polar: false,
        params: &[
            p("lat_0", "Latitude of false origin", "latitude_of_origin", 0.0),
            p("lon_0", "Longitude of false origin", "central_meridian", 0.0),
            p("lat_1", "Latitude of 1st standard parallel", "standard_parallel_1", 0.0),
            p("lat_2", "Latitude of 2nd standard parallel", "standard_parallel_2", 0.0),
            p("x_0", "Easting at false origin", "false_easting", 0.0),
            p("y_0", "Northing at false origin", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "lcc",
        method_name: "Lambert Conic Conformal (1SP)",
        wkt1_name: "Lambert_Conformal_Conic_1SP",
        requires: None,
        polar: false,
        params: &[
            p("lat_1", "Latitude of natural origin", "latitude_of_origin", 0.0),
            p("lon_0", "Longitude of natural origin", "central_meridian", 0.0),
            p("k_0", "Scale factor at natural origin", "scale_factor", 1.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "aea",
        method_name: "Albers Equal Area",
        wkt1_name: "Albers_Conic_Equal_Area",
        requires: None,
        polar: false,
        params: &[
            p("lat_0", "Latitude of false origin", "latitude_of_center", 0.0),
            p("lon_0", "Longitude of false origin", "longitude_of_center", 0.0),
            p("lat_1", "Latitude of 1st standard parallel", "standard_parallel_1", 0.0),
            p("lat_2", "Latitude of 2nd standard parallel", "standard_parallel_2", 0.0),
            p("x_0", "Easting at false origin", "false_easting", 0.0),
            p("y_0", "Northing at false origin", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "merc",
        method_name: "Mercator (variant B)",
        wkt1_name: "Mercator_2SP",
        requires: Some("lat_ts"),
        polar: false,
        params: &[
            p("lat_ts", "Latitude of 1st standard parallel", "standard_parallel_1", 0.0),
            p("lon_0", "Longitude of natural origin", "central_meridian", 0.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "merc",
        method_name: "Mercator (variant A)",
        wkt1_name: "Mercator_1SP",
        requires: None,
        polar: false,
        params: &[
            p("lat_0", "Latitude of natural origin", "latitude_of_origin", 0.0),
            p("lon_0", "Longitude of natural origin", "central_meridian", 0.0),
            p("k_0", "Scale factor at natural origin", "scale_factor", 1.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "laea",
        method_name: "Lambert Azimuthal Equal Area",
        wkt1_name: "Lambert_Azimuthal_Equal_Area",
        requires: None,
        polar: false,
        params: &[
            p("lat_0", "Latitude of natural origin", "latitude_of_center", 0.0),
            p("lon_0", "Longitude of natural origin", "longitude_of_center", 0.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "stere",
        method_name: "Polar Stereographic (variant B)",
        wkt1_name: "Polar_Stereographic",
        requires: Some("lat_ts"),
        polar: false,
        params: &[
            p("lat_ts", "Latitude of standard parallel", "latitude_of_origin", 0.0),
            p("lon_0", "Longitude of origin", "central_meridian", 0.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "stere",
        method_name: "Polar Stereographic (variant A)",
        wkt1_name: "Polar_Stereographic",
        requires: Some("k_0"),
        polar: true,
        params: &[
            p("lat_0", "Latitude of natural origin", "latitude_of_origin", 90.0),
            p("lon_0", "Longitude of natural origin", "central_meridian", 0.0),
            p("k_0", "Scale factor at natural origin", "scale_factor", 1.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
    MethodDef {
        proj_name: "cea",
        method_name: "Lambert Cylindrical Equal Area",
        wkt1_name: "Cylindrical_Equal_Area",
        requires: None,
        polar: false,
        params: &[
            p("lat_ts", "Latitude of 1st standard parallel", "standard_parallel_1", 0.0),
            p("lon_0", "Longitude of natural origin", "central_meridian", 0.0),
            p("x_0", "False easting", "false_easting", 0.0),
            p("y_0", "False northing", "false_northing", 0.0),
        ],
    },
];

/// Prefix of method names for projections without an EPSG method.
pub const PROJ_METHOD_PREFIX: &str = "PROJ ";

/// Keys describing the geodetic part of a definition, never the projection.
pub const GEODETIC_KEYS: &[&str] = &[
    "proj", "ellps", "datum", "a", "b", "rf", "f", "R", "es", "e", "towgs84", "pm", "units",
    "to_meter", "no_defs", "type", "nadgrids", "wktext", "init", "axis",
];

/// Alternative spellings PROJ accepts for a parameter.
const ALIASES: &[(&str, &str)] = &[("k", "k_0")];

fn matches_key(actual: &str, wanted: &str) -> bool {
    actual == wanted
        || ALIASES
            .iter()
            .any(|(alias, canonical)| *alias == actual && *canonical == wanted)
}

fn number(ps: &ProjString, key: &str) -> Option<f64> {
    ps.iter()
        .find(|(k, _)| matches_key(k, key))
        .and_then(|(_, v)| v.and_then(|v| v.parse::<f64>().ok()))
}

/// Select the method for a PROJ projection given its parameters.
pub fn method_for(proj_name: &str, ps: &ProjString) -> Option<&'static MethodDef> {
    METHODS.iter().find(|def| {
        def.proj_name == proj_name
            && def
                .requires
                .map(|key| ps.iter().any(|(k, _)| matches_key(k, key)))
                .unwrap_or(true)
            && (!def.polar || number(ps, "lat_0").map(|lat| lat.abs() == 90.0).unwrap_or(false))
    })
}

/// Find a method by EPSG or WKT1 name (case and underscore insensitive).
pub fn method_by_name(name: &str) -> Option<&'static MethodDef> {
    let wanted = normalize(name);
    METHODS
        .iter()
        .find(|def| normalize(def.method_name) == wanted || normalize(def.wkt1_name) == wanted)
}

fn normalize(name: &str) -> String {
    name.trim().replace('_', " ").to_lowercase()
}

/// Build the conversion of a projected definition.
pub fn operation_from_proj(ps: &ProjString) -> CrsResult<CoordinateOperation> {
    let proj_name = ps
        .value("proj")
        .ok_or_else(|| CrsError::Engine("definition has no projection".to_string()))?;

    if proj_name == "utm" {
        return utm_operation(ps);
    }

    if let Some(def) = method_for(proj_name, ps) {
        let params = def
            .params
            .iter()
            .map(|param| OperationParameter {
                name: param.epsg_name.to_string(),
                value: number(ps, param.proj_key).unwrap_or(param.default),
            })
            .collect();
        return Ok(CoordinateOperation {
            name: "unknown".to_string(),
            method_name: def.method_name.to_string(),
            params,
        });
    }

    // No EPSG method: carry the PROJ projection through its own name. Text
    // options and flags go into the method name, numbers become parameters.
    let mut method_name = format!("{}{}", PROJ_METHOD_PREFIX, proj_name);
    let mut params = Vec::new();
    for (key, value) in ps.iter() {
        if GEODETIC_KEYS.contains(&key) {
            continue;
        }
        match value {
            Some(text) => match text.parse::<f64>() {
                Ok(number) => params.push(OperationParameter {
                    name: key.to_string(),
                    value: number,
                }),
                Err(_) => method_name.push_str(&format!(" {}={}", key, text)),
            },
            None => method_name.push_str(&format!(" {}", key)),
        }
    }
    Ok(CoordinateOperation {
        name: "unknown".to_string(),
        method_name,
        params,
    })
}

fn utm_operation(ps: &ProjString) -> CrsResult<CoordinateOperation> {
    let zone = ps
        .value("zone")
        .and_then(|z| z.parse::<u8>().ok())
        .filter(|z| (1..=60).contains(z))
        .ok_or_else(|| CrsError::Engine("utm requires +zone between 1 and 60".to_string()))?;
    let south = ps.has("south");
    let params = [
        ("Latitude of natural origin", 0.0),
        ("Longitude of natural origin", -183.0 + 6.0 * zone as f64),
        ("Scale factor at natural origin", 0.9996),
        ("False easting", 500000.0),
        ("False northing", if south { 10000000.0 } else { 0.0 }),
    ]
    .into_iter()
    .map(|(name, value)| OperationParameter {
        name: name.to_string(),
        value,
    })
    .collect();
    Ok(CoordinateOperation {
        name: format!("UTM zone {}{}", zone, if south { 'S' } else { 'N' }),
        method_name: "Transverse Mercator".to_string(),
        params,
    })
}

/// Rebuild PROJ projection tokens (without geodetic keys) from a conversion.
///
/// Parameter names may be EPSG names, WKT1 names or raw PROJ keys.
pub fn proj_from_operation(operation: &CoordinateOperation) -> CrsResult<ProjString> {
    let mut ps = ProjString::default();

    if let Some(zone) = operation.name.strip_prefix("UTM zone ") {
        let (number, hemisphere) = zone.split_at(zone.len().saturating_sub(1));
        if let Ok(number) = number.parse::<u8>() {
            ps.push("proj", Some("utm".to_string()));
            ps.push("zone", Some(number.to_string()));
            if hemisphere.eq_ignore_ascii_case("s") {
                ps.push("south", None);
            }
            return Ok(ps);
        }
    }

    if let Some(rest) = operation.method_name.strip_prefix(PROJ_METHOD_PREFIX) {
        let mut words = rest.split_whitespace();
        let proj_name = words
            .next()
            .ok_or_else(|| CrsError::UnsupportedMethod(operation.method_name.clone()))?;
        ps.push("proj", Some(proj_name.to_string()));
        for word in words {
            match word.split_once('=') {
                Some((key, value)) => ps.push(key, Some(value.to_string())),
                None => ps.push(word, None),
            }
        }
        for param in &operation.params {
            ps.push(&param.name, Some(format_number(param.value)));
        }
        return Ok(ps);
    }

    let def = method_by_name(&operation.method_name)
        .ok_or_else(|| CrsError::UnsupportedMethod(operation.method_name.clone()))?;
    ps.push("proj", Some(def.proj_name.to_string()));
    if def.method_name == "Polar Stereographic (variant B)" {
        // Variant B has no origin latitude: the pole follows the standard parallel
        let pole = match operation.param("Latitude of standard parallel") {
            Some(lat_ts) if lat_ts < 0.0 => "-90",
            _ => "90",
        };
        ps.push("lat_0", Some(pole.to_string()));
    }
    for param in &operation.params {
        let key = def
            .params
            .iter()
            .find(|known| {
                known.epsg_name.eq_ignore_ascii_case(&param.name)
                    || known.wkt1_name.eq_ignore_ascii_case(&param.name)
                    || known.proj_key == param.name
            })
            .map(|known| known.proj_key);
        match key {
            Some(key) => ps.push(key, Some(format_number(param.value))),
            None => {
                return Err(CrsError::UnsupportedMethod(format!(
                    "{} (parameter '{}')",
                    operation.method_name, param.name
                )))
            }
        }
    }
    Ok(ps)
}

/// Numbers in rebuilt definitions use the shortest round-trip form.
pub(crate) fn format_number(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_variant_selection() {
        let two_sp = ProjString::parse("+proj=lcc +lat_1=25 +lat_2=30");
        assert_eq!(
            method_for("lcc", &two_sp).map(|d| d.method_name),
            Some("Lambert Conic Conformal (2SP)")
        );
        let one_sp = ProjString::parse("+proj=lcc +lat_1=25");
        assert_eq!(
            method_for("lcc", &one_sp).map(|d| d.method_name),
            Some("Lambert Conic Conformal (1SP)")
        );
        assert!(method_for("stere", &ProjString::parse("+proj=stere +lat_0=90")).is_none());
        assert_eq!(
            method_for("stere", &ProjString::parse("+proj=stere +lat_0=-90 +k=0.994"))
                .map(|d| d.method_name),
            Some("Polar Stereographic (variant A)")
        );
        assert!(method_for("stere", &ProjString::parse("+proj=stere +lat_0=45 +k=1")).is_none());
    }

    #[test]
    fn test_method_by_wkt1_name() {
        assert_eq!(
            method_by_name("Transverse_Mercator").map(|d| d.proj_name),
            Some("tmerc")
        );
        assert_eq!(
            method_by_name("albers equal area").map(|d| d.proj_name),
            Some("aea")
        );
        assert!(method_by_name("Hotine Oblique Mercator").is_none());
    }

    #[test]
    fn test_utm_operation() {
        let op = operation_from_proj(&ProjString::parse("+proj=utm +zone=10 +south")).unwrap();
        assert_eq!(op.name, "UTM zone 10S");
        assert_eq!(op.method_name, "Transverse Mercator");
        assert_eq!(op.param("Longitude of natural origin"), Some(-123.0));
        assert_eq!(op.param("False northing"), Some(10000000.0));

        let ps = proj_from_operation(&op).unwrap();
        assert_eq!(ps.render(), "+proj=utm +zone=10 +south");
    }

    #[test]
    fn test_utm_requires_valid_zone() {
        assert!(operation_from_proj(&ProjString::parse("+proj=utm +zone=61")).is_err());
        assert!(operation_from_proj(&ProjString::parse("+proj=utm")).is_err());
    }

    #[test]
    fn test_epsg_operation_round_trip() {
        let ps = ProjString::parse("+proj=tmerc +lat_0=0 +lon_0=-75 +k=0.9996 +x_0=500000");
        let op = operation_from_proj(&ps).unwrap();
        assert_eq!(op.param("Scale factor at natural origin"), Some(0.9996));
        assert_eq!(op.param("False northing"), Some(0.0));

        let rebuilt = proj_from_operation(&op).unwrap();
        assert_eq!(
            rebuilt.render(),
            "+proj=tmerc +lat_0=0 +lon_0=-75 +k_0=0.9996 +x_0=500000 +y_0=0"
        );
    }

    #[test]
    fn test_generic_proj_method() {
        let ps = ProjString::parse(
            "+proj=ob_tran +o_proj=longlat +o_lat_p=37.5 +o_lon_p=-160 +lon_0=180 +ellps=WGS84",
        );
        let op = operation_from_proj(&ps).unwrap();
        assert_eq!(op.method_name, "PROJ ob_tran o_proj=longlat");
        assert_eq!(op.param("o_lat_p"), Some(37.5));
        assert_eq!(op.params.len(), 3);

        let rebuilt = proj_from_operation(&op).unwrap();
        assert_eq!(
            rebuilt.render(),
            "+proj=ob_tran +o_proj=longlat +o_lat_p=37.5 +o_lon_p=-160 +lon_0=180"
        );
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let op = CoordinateOperation {
            name: "unknown".to_string(),
            method_name: "Krovak".to_string(),
            params: vec![],
        };
        assert!(matches!(
            proj_from_operation(&op),
            Err(CrsError::UnsupportedMethod(_))
        ));
    }
}
