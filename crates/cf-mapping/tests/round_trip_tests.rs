//! CF → PROJ → CF translation over the shared tables.

use cf_mapping::{CfMapper, CfSource, Direction, Translation, UnmappedPolicy};
use crs_common::{CrsError, ParamMap, ParamValue};
use test_utils::fixtures::cf;

fn to_proj(cf: &ParamMap) -> Translation {
    match CfMapper::cf_1_8().cf_to_proj(cf).unwrap() {
        CfSource::Params(translation) => translation,
        CfSource::Wkt(wkt) => panic!("unexpected WKT {}", wkt),
    }
}

#[test]
fn test_fixtures_round_trip_grid_mapping_name() {
    for attributes in [
        cf::hrrr_lambert_conformal(),
        cf::polar_stereographic(),
        cf::mercator(),
        cf::geostationary(),
        cf::latitude_longitude(),
        cf::rotated_pole(),
    ] {
        let name = attributes.get("grid_mapping_name").unwrap().clone();
        let proj = to_proj(&attributes);
        assert!(proj.skipped.is_empty(), "{}: {:?}", name, proj.skipped);

        let back = CfMapper::cf_1_8().proj_to_cf(proj.params, None);
        let resolved = back.params.get("grid_mapping_name").unwrap();
        // stere resolves to the general stereographic mapping
        if name == ParamValue::from("polar_stereographic") {
            assert_eq!(resolved, &ParamValue::from("stereographic"));
        } else {
            assert_eq!(resolved, &name);
        }
    }
}

#[test]
fn test_hrrr_attributes() {
    let proj = to_proj(&cf::hrrr_lambert_conformal()).params;
    assert_eq!(proj.get("proj"), Some(&ParamValue::from("lcc")));
    assert_eq!(proj.get("lat_1"), Some(&ParamValue::Float(38.5)));
    assert_eq!(proj.get("lat_2"), Some(&ParamValue::Float(38.5)));
    assert_eq!(proj.get("lon_0"), Some(&ParamValue::Float(262.5)));
    assert_eq!(proj.get("R"), Some(&ParamValue::Float(6371229.0)));

    let back = CfMapper::cf_1_8().proj_to_cf(proj, None).params;
    assert_eq!(
        back.get("longitude_of_central_meridian"),
        Some(&ParamValue::Float(262.5))
    );
    assert_eq!(
        back.get("standard_parallel"),
        Some(&ParamValue::FloatList(vec![38.5, 38.5]))
    );
}

#[test]
fn test_geostationary_sweep_inversion() {
    let mut attributes = cf::geostationary();
    attributes.remove("sweep_angle_axis");
    attributes.insert("fixed_angle_axis", "Y");
    let proj = to_proj(&attributes).params;
    assert_eq!(proj.get("sweep"), Some(&ParamValue::from("x")));

    attributes.insert("fixed_angle_axis", "z");
    assert!(matches!(
        CfMapper::cf_1_8().cf_to_proj(&attributes),
        Err(CrsError::InvalidParameter { .. })
    ));
}

#[test]
fn test_unmapped_attributes_follow_policy() {
    let mut attributes = cf::mercator();
    attributes.insert("units", "m");
    let translation = to_proj(&attributes);
    assert_eq!(translation.skipped, vec!["units".to_string()]);

    assert!(UnmappedPolicy::Warn
        .check(Direction::CfToProj, &translation.skipped)
        .is_ok());
    assert!(UnmappedPolicy::Deny
        .check(Direction::CfToProj, &translation.skipped)
        .is_err());
}
