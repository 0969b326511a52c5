//! Classification of user input into one of the supported CRS input shapes.

use crs_common::{CrsError, CrsResult, ParamMap};
use serde_json::{Map, Value};
use std::fmt;

use crate::normalize::{format_authority, format_epsg, normalize_dict, normalize_string, Normalized};

/// Anything that can describe itself as well-known text.
pub trait ToWkt {
    fn to_wkt(&self) -> String;
}

/// The input shapes a CRS can be created from.
///
/// Variants are listed in dispatch precedence order.
#[derive(Clone)]
pub enum CrsInput<'a> {
    /// PROJ string, JSON text, WKT or an authority string.
    Text(String),
    /// A JSON object: PROJ parameters or PROJJSON.
    Mapping(Map<String, Value>),
    /// PROJ parameters given as keyword arguments.
    Params(ParamMap),
    /// An EPSG code.
    Epsg(i64),
    /// An `(authority, code)` pair.
    Authority(String, String),
    /// An object that can render itself as WKT.
    Wkt(&'a dyn ToWkt),
}

impl CrsInput<'static> {
    /// Classify a dynamically typed value.
    ///
    /// Strings, objects, integers and two-element arrays are accepted; anything
    /// else fails with [`CrsError::InvalidInput`].
    pub fn from_value(value: Value) -> CrsResult<Self> {
        match value {
            Value::String(text) => Ok(CrsInput::Text(text)),
            Value::Object(map) => Ok(CrsInput::Mapping(map)),
            Value::Number(ref n) => n
                .as_i64()
                .map(CrsInput::Epsg)
                .ok_or_else(|| CrsError::InvalidInput(value.to_string())),
            Value::Array(ref items) if items.len() == 2 => {
                let auth_name = pair_item(&items[0]);
                let auth_code = pair_item(&items[1]);
                Ok(CrsInput::Authority(auth_name, auth_code))
            }
            other => Err(CrsError::InvalidInput(other.to_string())),
        }
    }
}

fn pair_item(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<'a> CrsInput<'a> {
    /// Produce the canonical definition handed to the engine.
    pub fn prepare(&self) -> CrsResult<Normalized> {
        match self {
            CrsInput::Text(text) => normalize_string(text),
            CrsInput::Mapping(map) => normalize_dict(map),
            CrsInput::Params(params) => normalize_dict(&params.to_json_map()),
            CrsInput::Epsg(code) => Ok(Normalized::new(format_epsg(code))),
            CrsInput::Authority(auth_name, auth_code) => {
                Ok(Normalized::new(format_authority(auth_name, auth_code)))
            }
            CrsInput::Wkt(source) => Ok(Normalized::new(source.to_wkt())),
        }
    }

    /// Name of the input shape, for logging.
    pub fn shape(&self) -> &'static str {
        match self {
            CrsInput::Text(_) => "text",
            CrsInput::Mapping(_) => "mapping",
            CrsInput::Params(_) => "params",
            CrsInput::Epsg(_) => "epsg",
            CrsInput::Authority(..) => "authority",
            CrsInput::Wkt(_) => "wkt",
        }
    }
}

impl fmt::Debug for CrsInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsInput::Text(text) => f.debug_tuple("Text").field(text).finish(),
            CrsInput::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            CrsInput::Params(params) => f.debug_tuple("Params").field(params).finish(),
            CrsInput::Epsg(code) => f.debug_tuple("Epsg").field(code).finish(),
            CrsInput::Authority(auth, code) => {
                f.debug_tuple("Authority").field(auth).field(code).finish()
            }
            CrsInput::Wkt(_) => f.write_str("Wkt(..)"),
        }
    }
}

impl From<&str> for CrsInput<'_> {
    fn from(text: &str) -> Self {
        CrsInput::Text(text.to_string())
    }
}

impl From<String> for CrsInput<'_> {
    fn from(text: String) -> Self {
        CrsInput::Text(text)
    }
}

impl From<&String> for CrsInput<'_> {
    fn from(text: &String) -> Self {
        CrsInput::Text(text.clone())
    }
}

impl From<Map<String, Value>> for CrsInput<'_> {
    fn from(map: Map<String, Value>) -> Self {
        CrsInput::Mapping(map)
    }
}

impl From<ParamMap> for CrsInput<'_> {
    fn from(params: ParamMap) -> Self {
        CrsInput::Params(params)
    }
}

impl From<&ParamMap> for CrsInput<'_> {
    fn from(params: &ParamMap) -> Self {
        CrsInput::Params(params.clone())
    }
}

impl From<i64> for CrsInput<'_> {
    fn from(code: i64) -> Self {
        CrsInput::Epsg(code)
    }
}

impl From<i32> for CrsInput<'_> {
    fn from(code: i32) -> Self {
        CrsInput::Epsg(code as i64)
    }
}

impl From<u32> for CrsInput<'_> {
    fn from(code: u32) -> Self {
        CrsInput::Epsg(code as i64)
    }
}

impl<A: fmt::Display, C: fmt::Display> From<(A, C)> for CrsInput<'_> {
    fn from((auth_name, auth_code): (A, C)) -> Self {
        CrsInput::Authority(auth_name.to_string(), auth_code.to_string())
    }
}

impl<'a, T: ToWkt> From<&'a T> for CrsInput<'a> {
    fn from(source: &'a T) -> Self {
        CrsInput::Wkt(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::ParamValue;
    use serde_json::json;

    struct FixedWkt(&'static str);

    impl ToWkt for FixedWkt {
        fn to_wkt(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_from_value_precedence() {
        assert!(matches!(
            CrsInput::from_value(json!("epsg:4326")).unwrap(),
            CrsInput::Text(_)
        ));
        assert!(matches!(
            CrsInput::from_value(json!({"proj": "utm"})).unwrap(),
            CrsInput::Mapping(_)
        ));
        assert!(matches!(
            CrsInput::from_value(json!(4326)).unwrap(),
            CrsInput::Epsg(4326)
        ));
        match CrsInput::from_value(json!(["IGNF", "LAMB93"])).unwrap() {
            CrsInput::Authority(auth, code) => {
                assert_eq!(auth, "IGNF");
                assert_eq!(code, "LAMB93");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_value_rejects_other_shapes() {
        for value in [json!(3.5), json!(null), json!(true), json!([1, 2, 3])] {
            let err = CrsInput::from_value(value.clone()).unwrap_err();
            assert!(matches!(err, CrsError::InvalidInput(ref v) if *v == value.to_string()));
        }
    }

    #[test]
    fn test_prepare_each_shape() {
        assert_eq!(CrsInput::from(4326).prepare().unwrap().definition, "epsg:4326");
        assert_eq!(
            CrsInput::from(("EPSG", "32615")).prepare().unwrap().definition,
            "EPSG:32615"
        );
        assert_eq!(
            CrsInput::from("+proj=longlat").prepare().unwrap().definition,
            "+proj=longlat +type=crs"
        );

        let params = ParamMap::from([
            ("proj", ParamValue::from("utm")),
            ("zone", ParamValue::from(10)),
        ]);
        assert_eq!(
            CrsInput::from(params).prepare().unwrap().definition,
            "+proj=utm +zone=10 +type=crs"
        );

        let source = FixedWkt(r#"GEOGCS["x"]"#);
        let input = CrsInput::from(&source);
        assert_eq!(input.shape(), "wkt");
        assert_eq!(input.prepare().unwrap().definition, r#"GEOGCS["x"]"#);
    }

    #[test]
    fn test_wkt_source_is_not_reclassified() {
        // Text from a WKT source is passed straight through, even if it looks
        // like a keyword string.
        let source = FixedWkt("+proj=longlat");
        assert_eq!(
            CrsInput::from(&source).prepare().unwrap().definition,
            "+proj=longlat"
        );
    }
}
