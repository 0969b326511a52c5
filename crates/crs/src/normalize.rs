//! Normalization of user CRS definitions into one engine-readable string.
//!
//! - keyword strings get their `proj`/`init` marker hoisted to the front and a
//!   `type=crs` marker appended
//! - JSON objects holding `proj` or `init` are rendered as keyword strings,
//!   any other JSON object is passed through as JSON text
//! - authority pairs become `AUTH:CODE`
//! - everything else (WKT, authority strings) is passed through untouched

use crs_common::{format_float, CrsError, CrsResult};
use crs_engine::is_wkt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;
use tracing::warn;

/// Tokens that identify the leading keyword of a PROJ string.
pub const LEADING_MARKERS: [&str; 4] = ["+init", "+proj", "init", "proj"];

static EQUALS_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*=\s*").expect("valid equals-spacing pattern"));

/// Non-fatal diagnostics produced while normalizing a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrsWarning {
    /// The definition uses the legacy `+init=<authority>:<code>` form.
    DeprecatedInitSyntax { definition: String },
}

impl fmt::Display for CrsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsWarning::DeprecatedInitSyntax { .. } => write!(
                f,
                "'+init=<authority>:<code>' syntax is deprecated. \
                 '<authority>:<code>' is the preferred initialization method."
            ),
        }
    }
}

/// A canonical definition plus the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub definition: String,
    pub warnings: Vec<CrsWarning>,
}

impl Normalized {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            warnings: Vec::new(),
        }
    }
}

/// Returns true if `text` is a PROJ keyword string.
///
/// Anything that is not JSON and not WKT but has a `key=value` token counts;
/// authority strings and URNs never contain `=`.
pub fn is_proj(text: &str) -> bool {
    !text.contains('{') && !is_wkt(text) && text.contains('=')
}

/// `AUTH:CODE`. Neither part is validated here.
pub fn format_authority(auth_name: impl fmt::Display, auth_code: impl fmt::Display) -> String {
    format!("{}:{}", auth_name, auth_code)
}

pub fn format_epsg(code: impl fmt::Display) -> String {
    format_authority("epsg", code)
}

// ============================================================================
// Strings
// ============================================================================

/// Normalize a textual CRS definition.
pub fn normalize_string(text: &str) -> CrsResult<Normalized> {
    if text.is_empty() {
        return Err(CrsError::Empty(text.to_string()));
    }

    if text.contains('{') {
        let relaxed = escape_control_chars(text);
        let value: Value = serde_json::from_str(&relaxed)?;
        return match value {
            Value::Object(map) if map.is_empty() => Err(CrsError::EmptyJson),
            Value::Object(map) => normalize_dict(&map),
            other => Err(CrsError::InvalidJson(format!(
                "expected a JSON object, got {}",
                other
            ))),
        };
    }

    if is_proj(text) {
        return Ok(normalize_keywords(text));
    }

    Ok(Normalized::new(fold_init_authority(text)))
}

fn normalize_keywords(text: &str) -> Normalized {
    let collapsed = EQUALS_SPACING.replace_all(text.trim_start(), "=");
    let mut definition = if starts_with_marker(&collapsed) {
        collapsed.into_owned()
    } else {
        hoist_marker(&collapsed)
    };

    if !definition.contains("type=crs") {
        if definition.contains('+') {
            definition.push_str(" +type=crs");
        } else {
            definition.push_str(" type=crs");
        }
    }

    let definition = fold_init_authority(&definition).trim().to_string();
    let mut normalized = Normalized::new(definition);
    if normalized.definition.starts_with("+init") || normalized.definition.starts_with("init") {
        let warning = CrsWarning::DeprecatedInitSyntax {
            definition: normalized.definition.clone(),
        };
        warn!(definition = %normalized.definition, "{}", warning);
        normalized.warnings.push(warning);
    }
    normalized
}

fn starts_with_marker(token: &str) -> bool {
    LEADING_MARKERS.iter().any(|marker| token.starts_with(marker))
}

/// Move the first marker token to the front, keeping every other token in
/// place.
fn hoist_marker(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if let Some(index) = tokens.iter().position(|token| starts_with_marker(token)) {
        let marker = tokens.remove(index);
        tokens.insert(0, marker);
    }
    tokens.join(" ")
}

/// `+init=EPSG` only resolves on case-insensitive filesystems.
fn fold_init_authority(text: &str) -> String {
    text.replace("+init=EPSG", "+init=epsg")
}

/// Escape raw control characters inside JSON string literals so that
/// multi-line WKT embedded in JSON still decodes.
fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            } else if c.is_control() {
                let _ = write!(out, "\\u{:04x}", c as u32);
                continue;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

// ============================================================================
// Dictionaries
// ============================================================================

/// Normalize a dictionary of PROJ parameters or a structured CRS JSON object.
///
/// Without a `proj` or `init` key the object is taken to be PROJJSON and is
/// returned as JSON text.
pub fn normalize_dict(params: &Map<String, Value>) -> CrsResult<Normalized> {
    if !params.contains_key("proj") && !params.contains_key("init") {
        return Ok(Normalized::new(serde_json::to_string(params)?));
    }

    let mut tokens = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Null | Value::Bool(true) => tokens.push(format!("+{}", key)),
            Value::Bool(false) => {}
            other => tokens.push(format!("+{}={}", key, keyword_value(other))),
        }
    }
    normalize_string(&tokens.join(" "))
}

/// Render a JSON value as the right-hand side of a `key=value` token.
fn keyword_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_float).unwrap_or_else(|| n.to_string()),
        },
        Value::Array(items) => items
            .iter()
            .map(keyword_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_is_proj() {
        assert!(is_proj("+proj=utm +zone=10"));
        assert!(is_proj("proj=longlat"));
        assert!(!is_proj("EPSG:4326"));
        assert!(!is_proj("urn:ogc:def:crs:EPSG::4326"));
        assert!(!is_proj(r#"GEOGCS["name=odd",DATUM["x"]]"#));
        assert!(!is_proj(r#"{"proj": "utm"}"#));
    }

    #[test]
    fn test_keyword_reordering() {
        let normalized = normalize_string("+zone=10 +proj=utm").unwrap();
        assert_eq!(normalized.definition, "+proj=utm +zone=10 +type=crs");
        assert!(normalized.warnings.is_empty());

        // Only the first marker moves
        let normalized = normalize_string("+zone=10 +proj=utm +ellps=WGS84 +proj=x").unwrap();
        assert_eq!(
            normalized.definition,
            "+proj=utm +zone=10 +ellps=WGS84 +proj=x +type=crs"
        );
    }

    #[test]
    fn test_equals_spacing_collapsed() {
        let normalized = normalize_string("  proj = utm zone = 10").unwrap();
        assert_eq!(normalized.definition, "proj=utm zone=10 type=crs");
    }

    #[test]
    fn test_type_crs_not_duplicated() {
        let normalized = normalize_string("+proj=longlat +type=crs").unwrap();
        assert_eq!(normalized.definition, "+proj=longlat +type=crs");
    }

    #[test]
    fn test_deprecated_init() {
        let normalized = normalize_string("+init=EPSG:4326").unwrap();
        assert_eq!(normalized.definition, "+init=epsg:4326 +type=crs");
        assert_eq!(normalized.warnings.len(), 1);
        assert!(normalized.warnings[0].to_string().contains("deprecated"));
    }

    #[test]
    fn test_opaque_strings_pass_through() {
        assert_eq!(normalize_string("EPSG:4326").unwrap().definition, "EPSG:4326");
        let wkt = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]]]"#;
        assert_eq!(normalize_string(wkt).unwrap().definition, wkt);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches!(normalize_string(""), Err(CrsError::Empty(_))));
        assert!(matches!(normalize_string("{}"), Err(CrsError::EmptyJson)));
        assert!(matches!(normalize_string("{bad json"), Err(CrsError::InvalidJson(_))));
    }

    #[test]
    fn test_json_string_with_proj_key() {
        let normalized = normalize_string(r#"{"proj": "utm", "zone": 10}"#).unwrap();
        assert_eq!(normalized.definition, "+proj=utm +zone=10 +type=crs");
    }

    #[test]
    fn test_json_with_raw_newlines() {
        let text = "{\"type\": \"GeographicCRS\", \"name\": \"multi\nline\"}";
        let normalized = normalize_string(text).unwrap();
        assert!(normalized.definition.starts_with("{\"type\":\"GeographicCRS\""));
    }

    #[test]
    fn test_dict_flags_and_lists() {
        let params = object(json!({
            "proj": "longlat",
            "towgs84": [-87, -98.5, -121],
            "no_defs": true,
            "over": false,
            "wktext": null,
            "lon_0": 10.0
        }));
        let normalized = normalize_dict(&params).unwrap();
        assert_eq!(
            normalized.definition,
            "+proj=longlat +towgs84=-87,-98.5,-121 +no_defs +wktext +lon_0=10.0 +type=crs"
        );
    }

    #[test]
    fn test_dict_marker_hoisted() {
        let params = object(json!({"zone": 10, "proj": "utm"}));
        assert_eq!(
            normalize_dict(&params).unwrap().definition,
            "+proj=utm +zone=10 +type=crs"
        );
    }

    #[test]
    fn test_dict_without_marker_is_json() {
        let params = object(json!({"type": "GeographicCRS", "name": "WGS 84"}));
        assert_eq!(
            normalize_dict(&params).unwrap().definition,
            r#"{"type":"GeographicCRS","name":"WGS 84"}"#
        );
    }

    #[test]
    fn test_format_authority() {
        assert_eq!(format_authority("EPSG", 4326), "EPSG:4326");
        assert_eq!(format_epsg(32615), "epsg:32615");
        assert_eq!(format_authority("IAU_2015", "49900"), "IAU_2015:49900");
    }
}
