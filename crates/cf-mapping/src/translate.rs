//! Table-driven translation between PROJ parameter dictionaries and CF
//! grid-mapping attribute dictionaries.
//!
//! Both directions are lossy: parameters without a table entry are collected in
//! [`Translation::skipped`] and it is up to the caller to decide what to do with
//! them (see [`crate::UnmappedPolicy`]).

use crs_common::{CoordinateOperation, CrsError, CrsResult, ParamMap, ParamValue};
use tracing::debug;

use crate::tables::{is_lonlat, MappingTables, UNKNOWN_GRID_MAPPING};

/// CF attribute carrying the full WKT of the CRS.
pub const CRS_WKT_KEY: &str = "crs_wkt";

/// Legacy CF attribute carrying the WKT of the CRS.
pub const SPATIAL_REF_KEY: &str = "spatial_ref";

pub const GRID_MAPPING_NAME_KEY: &str = "grid_mapping_name";

/// Result of a translation: the translated dictionary and the names that had
/// no mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub params: ParamMap,
    pub skipped: Vec<String>,
}

/// What a CF dictionary resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum CfSource {
    /// The dictionary carried WKT under `crs_wkt` or `spatial_ref`.
    Wkt(String),
    /// PROJ parameters assembled from the grid-mapping attributes.
    Params(Translation),
}

/// Stateless translator over a set of mapping tables.
#[derive(Debug, Clone, Copy)]
pub struct CfMapper<'t> {
    tables: &'t MappingTables,
}

impl CfMapper<'static> {
    /// Mapper over the shared CF-1.8 tables.
    pub fn cf_1_8() -> Self {
        Self::new(MappingTables::cf_1_8())
    }
}

impl Default for CfMapper<'static> {
    fn default() -> Self {
        Self::cf_1_8()
    }
}

impl<'t> CfMapper<'t> {
    pub fn new(tables: &'t MappingTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'t MappingTables {
        self.tables
    }

    /// Translate a PROJ parameter dictionary into CF grid-mapping attributes.
    ///
    /// `operation` is the coordinate operation of the CRS; it is only consulted
    /// when the projection name has no CF equivalent.
    pub fn proj_to_cf(
        &self,
        mut proj: ParamMap,
        operation: Option<&CoordinateOperation>,
    ) -> Translation {
        let mut cf = ParamMap::new();
        let mut skipped = Vec::new();

        let proj_name = proj.remove("proj").map(|v| v.to_string()).unwrap_or_default();
        let mut grid_mapping_name = if is_lonlat(&proj_name) {
            "latitude_longitude".to_string()
        } else {
            self.tables
                .grid_mapping_name(&proj_name)
                .unwrap_or(UNKNOWN_GRID_MAPPING)
                .to_string()
        };

        if grid_mapping_name == "rotated_latitude_longitude" {
            let o_proj = proj.remove("o_proj").map(|v| v.to_string());
            if !o_proj.as_deref().map(is_lonlat).unwrap_or(false) {
                grid_mapping_name = UNKNOWN_GRID_MAPPING.to_string();
            }
        }

        if grid_mapping_name == UNKNOWN_GRID_MAPPING {
            if let Some(operation) = operation {
                if let Some(name) = self.tables.grid_mapping_for_method(&operation.method_name) {
                    debug!(
                        method = %operation.method_name,
                        grid_mapping_name = name,
                        "Resolved grid mapping from coordinate operation"
                    );
                    grid_mapping_name = name.to_string();
                    for param in &operation.params {
                        match self.tables.cf_param_for_method_param(&param.name) {
                            Some(cf_name) => {
                                cf.insert(cf_name, param.value);
                            }
                            None => skipped.push(param.name.clone()),
                        }
                    }
                }
            }
        }

        cf.insert(GRID_MAPPING_NAME_KEY, grid_mapping_name.as_str());

        if let Some(lon_0) = proj.remove("lon_0") {
            match self.tables.lon_0_attribute(&grid_mapping_name) {
                Some(cf_name) => {
                    cf.insert(cf_name, lon_0);
                }
                None => skipped.push("lon_0".to_string()),
            }
        }

        if let Some(k_0) = proj.remove("k_0") {
            match self.tables.k_0_attribute(&grid_mapping_name) {
                Some(cf_name) => {
                    cf.insert(cf_name, k_0);
                }
                None => skipped.push("k_0".to_string()),
            }
        }

        if proj.contains_key("lat_1") && proj.contains_key("lat_2") {
            let lat_1 = proj.remove("lat_1");
            let lat_2 = proj.remove("lat_2");
            if let (Some(lat_1), Some(lat_2)) = (lat_1, lat_2) {
                cf.insert("standard_parallel", standard_parallel_pair(lat_1, lat_2));
            }
        } else if let Some(lat_1) = proj.remove("lat_1") {
            cf.insert("standard_parallel", lat_1);
        } else if let Some(lat_ts) = proj.remove("lat_ts") {
            cf.insert("standard_parallel", lat_ts);
        }

        for (proj_param, value) in proj {
            match self.tables.cf_param(&proj_param) {
                Some(cf_name) => {
                    cf.insert(cf_name, value);
                }
                None => skipped.push(proj_param),
            }
        }

        Translation {
            params: cf,
            skipped,
        }
    }

    /// Translate CF grid-mapping attributes into a PROJ parameter dictionary.
    ///
    /// The input is never modified. A `crs_wkt` (or legacy `spatial_ref`)
    /// attribute short-circuits the tables entirely.
    pub fn cf_to_proj(&self, in_cf: &ParamMap) -> CrsResult<CfSource> {
        if let Some(wkt) = in_cf
            .get(CRS_WKT_KEY)
            .or_else(|| in_cf.get(SPATIAL_REF_KEY))
        {
            return Ok(CfSource::Wkt(wkt.to_string()));
        }

        let mut cf = in_cf.clone();
        let grid_mapping_name = cf
            .remove(GRID_MAPPING_NAME_KEY)
            .map(|v| v.to_string())
            .ok_or_else(|| CrsError::MissingKey(GRID_MAPPING_NAME_KEY.to_string()))?;
        let proj_name = self
            .tables
            .proj_name(&grid_mapping_name)
            .ok_or_else(|| CrsError::UnsupportedGridMapping(grid_mapping_name.clone()))?
            .to_string();

        let mut proj = ParamMap::new();
        proj.insert("proj", proj_name.as_str());
        if grid_mapping_name == "rotated_latitude_longitude" {
            proj.insert("o_proj", "longlat");
        } else if grid_mapping_name == "oblique_mercator" {
            if let Some(lonc) = cf.remove("longitude_of_projection_origin") {
                proj.insert("lonc", lonc);
            }
        }

        if let Some(standard_parallel) = cf.remove("standard_parallel") {
            expand_standard_parallel(&mut proj, &proj_name, standard_parallel)?;
        }

        // fixed_angle_axis is the opposite of PROJ's sweep axis
        if let Some(fixed_angle_axis) = cf.remove("fixed_angle_axis") {
            proj.insert("sweep", sweep_for_fixed_angle_axis(&fixed_angle_axis)?);
        }

        let mut skipped = Vec::new();
        for (cf_param, value) in cf {
            match self.tables.proj_param(&cf_param) {
                Some(proj_param) => {
                    proj.insert(proj_param, value);
                }
                None => skipped.push(cf_param),
            }
        }

        Ok(CfSource::Params(Translation {
            params: proj,
            skipped,
        }))
    }
}

fn standard_parallel_pair(lat_1: ParamValue, lat_2: ParamValue) -> ParamValue {
    match (lat_1.as_f64(), lat_2.as_f64()) {
        (Some(lat_1), Some(lat_2)) => ParamValue::FloatList(vec![lat_1, lat_2]),
        _ => ParamValue::Text(format!("{},{}", lat_1, lat_2)),
    }
}

fn expand_standard_parallel(
    proj: &mut ParamMap,
    proj_name: &str,
    standard_parallel: ParamValue,
) -> CrsResult<()> {
    let scalar = match standard_parallel {
        ParamValue::FloatList(values) => match values.as_slice() {
            [lat_1, lat_2] => {
                proj.insert("lat_1", *lat_1);
                proj.insert("lat_2", *lat_2);
                return Ok(());
            }
            [single] => ParamValue::Float(*single),
            _ => {
                return Err(CrsError::InvalidParameter {
                    param: "standard_parallel".to_string(),
                    message: format!("expected one or two values, got {}", values.len()),
                })
            }
        },
        other => other,
    };

    if proj_name == "merc" {
        proj.insert("lat_ts", scalar);
    } else {
        proj.insert("lat_1", scalar);
    }
    Ok(())
}

fn sweep_for_fixed_angle_axis(fixed_angle_axis: &ParamValue) -> CrsResult<&'static str> {
    let axis = fixed_angle_axis.to_string().trim().to_lowercase();
    match axis.as_str() {
        "x" => Ok("y"),
        "y" => Ok("x"),
        _ => Err(CrsError::InvalidParameter {
            param: "fixed_angle_axis".to_string(),
            message: format!("expected 'x' or 'y', got '{}'", fixed_angle_axis),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::OperationParameter;

    fn params(entries: &[(&str, ParamValue)]) -> ParamMap {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_proj_to_cf_lcc() {
        let proj = params(&[
            ("proj", "lcc".into()),
            ("lat_1", 25.0.into()),
            ("lat_2", 35.0.into()),
            ("lat_0", 25.0.into()),
            ("lon_0", 265.0.into()),
            ("R", 6371229.into()),
        ]);
        let result = CfMapper::cf_1_8().proj_to_cf(proj, None);

        assert!(result.skipped.is_empty());
        let cf = result.params;
        assert_eq!(
            cf.get("grid_mapping_name"),
            Some(&ParamValue::from("lambert_conformal_conic"))
        );
        assert_eq!(
            cf.get("standard_parallel"),
            Some(&ParamValue::FloatList(vec![25.0, 35.0]))
        );
        assert_eq!(
            cf.get("longitude_of_central_meridian"),
            Some(&ParamValue::Float(265.0))
        );
        assert_eq!(
            cf.get("latitude_of_projection_origin"),
            Some(&ParamValue::Float(25.0))
        );
        assert_eq!(cf.get("earth_radius"), Some(&ParamValue::Int(6371229)));
    }

    #[test]
    fn test_proj_to_cf_lonlat_alias() {
        let proj = params(&[("proj", "longlat".into()), ("datum", "WGS84".into())]);
        let result = CfMapper::cf_1_8().proj_to_cf(proj, None);
        assert_eq!(
            result.params.get("grid_mapping_name"),
            Some(&ParamValue::from("latitude_longitude"))
        );
        assert_eq!(
            result.params.get("horizontal_datum_name"),
            Some(&ParamValue::from("WGS84"))
        );
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_proj_to_cf_single_standard_parallel() {
        let proj = params(&[("proj", "merc".into()), ("lat_ts", 20.0.into())]);
        let cf = CfMapper::cf_1_8().proj_to_cf(proj, None).params;
        assert_eq!(cf.get("standard_parallel"), Some(&ParamValue::Float(20.0)));

        // lat_1 wins over lat_ts, lat_ts is then just unmapped
        let proj = params(&[
            ("proj", "stere".into()),
            ("lat_1", 60.0.into()),
            ("lat_ts", 70.0.into()),
        ]);
        let result = CfMapper::cf_1_8().proj_to_cf(proj, None);
        assert_eq!(result.params.get("standard_parallel"), Some(&ParamValue::Float(60.0)));
        assert_eq!(result.skipped, vec!["lat_ts".to_string()]);
    }

    #[test]
    fn test_proj_to_cf_rotated_pole() {
        let proj = params(&[
            ("proj", "ob_tran".into()),
            ("o_proj", "longlat".into()),
            ("o_lat_p", 37.5.into()),
            ("o_lon_p", 177.5.into()),
            ("lon_0", 0.0.into()),
        ]);
        let cf = CfMapper::cf_1_8().proj_to_cf(proj, None).params;
        assert_eq!(
            cf.get("grid_mapping_name"),
            Some(&ParamValue::from("rotated_latitude_longitude"))
        );
        assert_eq!(cf.get("grid_north_pole_latitude"), Some(&ParamValue::Float(37.5)));
        assert_eq!(cf.get("grid_north_pole_longitude"), Some(&ParamValue::Float(177.5)));
        assert_eq!(cf.get("north_pole_grid_longitude"), Some(&ParamValue::Float(0.0)));
    }

    #[test]
    fn test_proj_to_cf_rotated_pole_with_other_projection_is_unknown() {
        let proj = params(&[("proj", "ob_tran".into()), ("o_proj", "merc".into())]);
        let cf = CfMapper::cf_1_8().proj_to_cf(proj, None).params;
        assert_eq!(cf.get("grid_mapping_name"), Some(&ParamValue::from("unknown")));
    }

    #[test]
    fn test_proj_to_cf_falls_back_to_operation_method() {
        let operation = CoordinateOperation {
            name: "UTM zone 10N".to_string(),
            method_name: "Transverse Mercator".to_string(),
            params: vec![
                OperationParameter { name: "Latitude of natural origin".to_string(), value: 0.0 },
                OperationParameter { name: "Longitude of natural origin".to_string(), value: -123.0 },
                OperationParameter { name: "Scale factor at natural origin".to_string(), value: 0.9996 },
                OperationParameter { name: "False easting".to_string(), value: 500000.0 },
                OperationParameter { name: "False northing".to_string(), value: 0.0 },
            ],
        };
        let proj = params(&[
            ("proj", "utm".into()),
            ("zone", 10.into()),
            ("ellps", "WGS84".into()),
        ]);
        let result = CfMapper::cf_1_8().proj_to_cf(proj, Some(&operation));
        let cf = &result.params;
        assert_eq!(
            cf.get("grid_mapping_name"),
            Some(&ParamValue::from("transverse_mercator"))
        );
        assert_eq!(
            cf.get("longitude_of_central_meridian"),
            Some(&ParamValue::Float(-123.0))
        );
        assert_eq!(
            cf.get("scale_factor_at_central_meridian"),
            Some(&ParamValue::Float(0.9996))
        );
        assert_eq!(cf.get("false_easting"), Some(&ParamValue::Float(500000.0)));
        assert_eq!(
            cf.get("reference_ellipsoid_name"),
            Some(&ParamValue::from("WGS84"))
        );
        assert_eq!(result.skipped, vec!["zone".to_string()]);
    }

    #[test]
    fn test_proj_to_cf_unknown_projection() {
        let proj = params(&[("proj", "robin".into()), ("lon_0", 10.0.into())]);
        let cf = CfMapper::cf_1_8().proj_to_cf(proj, None).params;
        assert_eq!(cf.get("grid_mapping_name"), Some(&ParamValue::from("unknown")));
        assert_eq!(
            cf.get("longitude_of_projection_origin"),
            Some(&ParamValue::Float(10.0))
        );
    }

    #[test]
    fn test_cf_to_proj_wkt_short_circuit() {
        let cf = params(&[
            ("crs_wkt", "GEOGCRS[\"WGS 84\"]".into()),
            ("grid_mapping_name", "bogus".into()),
        ]);
        let source = CfMapper::cf_1_8().cf_to_proj(&cf).unwrap();
        assert_eq!(source, CfSource::Wkt("GEOGCRS[\"WGS 84\"]".to_string()));

        let cf = params(&[("spatial_ref", "PROJCS[\"x\"]".into())]);
        let source = CfMapper::cf_1_8().cf_to_proj(&cf).unwrap();
        assert_eq!(source, CfSource::Wkt("PROJCS[\"x\"]".to_string()));
    }

    #[test]
    fn test_cf_to_proj_missing_grid_mapping_name() {
        let cf = params(&[("standard_parallel", 25.0.into())]);
        let err = CfMapper::cf_1_8().cf_to_proj(&cf).unwrap_err();
        assert!(matches!(err, CrsError::MissingKey(ref key) if key == "grid_mapping_name"));
    }

    #[test]
    fn test_cf_to_proj_unsupported_grid_mapping() {
        let cf = params(&[("grid_mapping_name", "bogus_projection".into())]);
        let err = CfMapper::cf_1_8().cf_to_proj(&cf).unwrap_err();
        assert!(matches!(err, CrsError::UnsupportedGridMapping(ref name) if name == "bogus_projection"));
    }

    fn unwrap_params(source: CfSource) -> Translation {
        match source {
            CfSource::Params(translation) => translation,
            CfSource::Wkt(wkt) => panic!("unexpected WKT: {}", wkt),
        }
    }

    #[test]
    fn test_cf_to_proj_standard_parallel_pair() {
        let cf = params(&[
            ("grid_mapping_name", "albers_conical_equal_area".into()),
            ("standard_parallel", vec![10.0, 20.0].into()),
            ("longitude_of_central_meridian", (-96.0).into()),
        ]);
        let translation = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap());
        let proj = translation.params;
        assert_eq!(proj.get("proj"), Some(&ParamValue::from("aea")));
        assert_eq!(proj.get("lat_1"), Some(&ParamValue::Float(10.0)));
        assert_eq!(proj.get("lat_2"), Some(&ParamValue::Float(20.0)));
        assert_eq!(proj.get("lon_0"), Some(&ParamValue::Float(-96.0)));
        assert!(translation.skipped.is_empty());
    }

    #[test]
    fn test_cf_to_proj_mercator_standard_parallel() {
        let cf = params(&[
            ("grid_mapping_name", "mercator".into()),
            ("standard_parallel", 20.0.into()),
        ]);
        let proj = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap()).params;
        assert_eq!(proj.get("lat_ts"), Some(&ParamValue::Float(20.0)));
        assert!(!proj.contains_key("lat_1"));
    }

    #[test]
    fn test_cf_to_proj_rotated_pole() {
        let cf = params(&[
            ("grid_mapping_name", "rotated_latitude_longitude".into()),
            ("grid_north_pole_latitude", 37.5.into()),
            ("grid_north_pole_longitude", 177.5.into()),
        ]);
        let proj = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap()).params;
        assert_eq!(
            proj.keys().collect::<Vec<_>>(),
            vec!["proj", "o_proj", "o_lat_p", "o_lon_p"]
        );
        assert_eq!(proj.get("o_proj"), Some(&ParamValue::from("longlat")));
    }

    #[test]
    fn test_cf_to_proj_oblique_mercator_lonc() {
        let cf = params(&[
            ("grid_mapping_name", "oblique_mercator".into()),
            ("longitude_of_projection_origin", 5.0.into()),
            ("azimuth_of_central_line", 30.0.into()),
        ]);
        let proj = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap()).params;
        assert_eq!(proj.get("lonc"), Some(&ParamValue::Float(5.0)));
        assert_eq!(proj.get("alpha"), Some(&ParamValue::Float(30.0)));
        assert!(!proj.contains_key("lon_0"));

        // lonc is optional
        let cf = params(&[("grid_mapping_name", "oblique_mercator".into())]);
        let proj = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap()).params;
        assert!(!proj.contains_key("lonc"));
    }

    #[test]
    fn test_cf_to_proj_fixed_angle_axis_inversion() {
        let cf = params(&[
            ("grid_mapping_name", "geostationary".into()),
            ("perspective_point_height", 35786023.0.into()),
            ("fixed_angle_axis", "X".into()),
        ]);
        let proj = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap()).params;
        assert_eq!(proj.get("sweep"), Some(&ParamValue::from("y")));
        assert_eq!(proj.get("h"), Some(&ParamValue::Float(35786023.0)));

        let cf = params(&[
            ("grid_mapping_name", "geostationary".into()),
            ("fixed_angle_axis", "y".into()),
        ]);
        let proj = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap()).params;
        assert_eq!(proj.get("sweep"), Some(&ParamValue::from("x")));
    }

    #[test]
    fn test_cf_to_proj_fixed_angle_axis_rejects_other_values() {
        let cf = params(&[
            ("grid_mapping_name", "geostationary".into()),
            ("fixed_angle_axis", "z".into()),
        ]);
        let err = CfMapper::cf_1_8().cf_to_proj(&cf).unwrap_err();
        assert!(matches!(err, CrsError::InvalidParameter { ref param, .. } if param == "fixed_angle_axis"));
    }

    #[test]
    fn test_cf_to_proj_records_skipped() {
        let cf = params(&[
            ("grid_mapping_name", "transverse_mercator".into()),
            ("scale_factor_at_central_meridian", 0.9996.into()),
            ("long_name", "CRS definition".into()),
        ]);
        let translation = unwrap_params(CfMapper::cf_1_8().cf_to_proj(&cf).unwrap());
        assert_eq!(translation.params.get("k_0"), Some(&ParamValue::Float(0.9996)));
        assert_eq!(translation.skipped, vec!["long_name".to_string()]);
    }

    #[test]
    fn test_cf_to_proj_does_not_modify_input() {
        let cf = params(&[
            ("grid_mapping_name", "mercator".into()),
            ("standard_parallel", 20.0.into()),
        ]);
        let before = cf.clone();
        CfMapper::cf_1_8().cf_to_proj(&cf).unwrap();
        assert_eq!(cf, before);
    }

    #[test]
    fn test_substitute_tables() {
        let tables = MappingTables::new()
            .with_grid_mapping("my_grid", "myproj")
            .with_cf_param("my_origin", "lat_0");
        let cf = params(&[
            ("grid_mapping_name", "my_grid".into()),
            ("my_origin", 12.0.into()),
        ]);
        let proj = unwrap_params(CfMapper::new(&tables).cf_to_proj(&cf).unwrap()).params;
        assert_eq!(proj.get("proj"), Some(&ParamValue::from("myproj")));
        assert_eq!(proj.get("lat_0"), Some(&ParamValue::Float(12.0)));
    }
}
