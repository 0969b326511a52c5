//! Command line argument classification and CF attribute files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crs::{CrsError, CrsInput, CrsResult, ParamMap};
use serde_json::Value;
use tracing::debug;

/// Classify a raw argument.
///
/// Arguments that parse as JSON go through the dynamic classifier, so `4326`
/// is an EPSG code and `["EPSG", "3413"]` an authority pair. Everything else
/// is CRS text.
pub fn parse_input(raw: &str) -> CrsResult<CrsInput<'static>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => CrsInput::from_value(value),
        Err(_) => Ok(CrsInput::Text(raw.to_string())),
    }
}

/// Read CF grid-mapping attributes from a JSON or YAML file.
///
/// `.yaml`/`.yml` files are read as YAML, everything else as JSON.
pub fn read_cf_file(path: &Path) -> Result<ParamMap> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read CF attributes from {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    debug!(path = %path.display(), yaml = is_yaml, "Loading CF attributes");

    let attributes: ParamMap = if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .map_err(CrsError::from)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    };
    Ok(attributes)
}

/// Process exit status for a failed command.
///
/// CRS errors map through their category; I/O and YAML failures exit with 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CrsError>()
        .map(CrsError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs::ParamValue;
    use test_utils::write_temp_file;

    #[test]
    fn test_parse_input_shapes() {
        assert!(matches!(parse_input("4326").unwrap(), CrsInput::Epsg(4326)));
        assert!(matches!(
            parse_input(r#"["EPSG", "3413"]"#).unwrap(),
            CrsInput::Authority(ref auth, ref code) if auth == "EPSG" && code == "3413"
        ));
        assert!(matches!(
            parse_input(r#"{"proj": "utm", "zone": 10}"#).unwrap(),
            CrsInput::Mapping(_)
        ));
        assert!(matches!(
            parse_input("+proj=utm +zone=10").unwrap(),
            CrsInput::Text(ref text) if text == "+proj=utm +zone=10"
        ));
        assert!(matches!(
            parse_input("EPSG:4326").unwrap(),
            CrsInput::Text(_)
        ));
    }

    #[test]
    fn test_parse_input_rejects_float() {
        assert!(matches!(
            parse_input("3.5"),
            Err(CrsError::InvalidInput(ref value)) if value == "3.5"
        ));
    }

    #[test]
    fn test_read_cf_file_yaml() {
        let file = write_temp_file(
            "hrrr.yaml",
            "grid_mapping_name: lambert_conformal_conic\n\
             standard_parallel: [38.5, 38.5]\n\
             longitude_of_central_meridian: 262.5\n",
        );
        let attributes = read_cf_file(&file.path).unwrap();
        assert_eq!(
            attributes.get("grid_mapping_name"),
            Some(&ParamValue::from("lambert_conformal_conic"))
        );
        assert_eq!(
            attributes.get("standard_parallel"),
            Some(&ParamValue::FloatList(vec![38.5, 38.5]))
        );
        let keys: Vec<&str> = attributes.keys().collect();
        assert_eq!(keys[0], "grid_mapping_name");
    }

    #[test]
    fn test_read_cf_file_bad_json_exit_code() {
        let file = write_temp_file("broken.json", "{\"grid_mapping_name\": ");
        let err = read_cf_file(&file.path).unwrap_err();
        assert_eq!(exit_code(&err), 3);

        let err = read_cf_file(Path::new("/nonexistent/attributes.json")).unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }
}
