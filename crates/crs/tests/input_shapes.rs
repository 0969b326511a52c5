//! CRS creation from every supported input shape.

use crs::{Crs, CrsError, CrsInput, CrsWarning, ParamMap, ParamValue};
use serde_json::json;
use test_utils::assert_approx_eq;
use test_utils::fixtures::{projjson, proj, wkt};

fn inputs() -> Vec<CrsInput<'static>> {
    vec![
        CrsInput::from(proj::UTM_10N),
        CrsInput::from(proj::UTM_ZONE_FIRST),
        CrsInput::from(proj::HRRR_LCC),
        CrsInput::from(proj::ROTATED_POLE),
        CrsInput::from(proj::GOES_EAST),
        CrsInput::from(wkt::UTM_33N_WKT1),
        CrsInput::from(wkt::WGS84_WKT2),
        CrsInput::from(projjson::WGS84),
        CrsInput::from("EPSG:3857"),
        CrsInput::from("urn:ogc:def:crs:OGC:1.3:CRS84"),
        CrsInput::from(4326),
        CrsInput::from(("epsg", 32633)),
        CrsInput::from(ParamMap::from([
            ("proj", ParamValue::from("stere")),
            ("lat_0", ParamValue::from(90)),
            ("lat_ts", ParamValue::from(70.0)),
            ("lon_0", ParamValue::from(-45)),
            ("datum", ParamValue::from("WGS84")),
            ("no_defs", ParamValue::from(true)),
        ])),
        CrsInput::from_value(json!({"proj": "longlat", "datum": "NAD83"})).unwrap(),
    ]
}

#[test]
fn test_normalization_is_idempotent() {
    for input in inputs() {
        let debug = format!("{:?}", input);
        let crs = Crs::from_user_input(input).unwrap_or_else(|e| panic!("{}: {}", debug, e));
        let again = Crs::from_string(crs.srs()).unwrap();
        assert_eq!(again.srs(), crs.srs(), "{}", debug);
        assert_eq!(again, crs, "{}", debug);
    }
}

#[test]
fn test_existing_crs_as_input() {
    for input in inputs() {
        let crs = Crs::from_user_input(input).unwrap();
        let copy = Crs::from_user_input(&crs).unwrap();
        assert_eq!(copy, crs);
        assert_eq!(copy.name(), crs.name());
    }
}

#[test]
fn test_keyword_string_reordered() {
    let crs = Crs::from_user_input(proj::UTM_ZONE_FIRST).unwrap();
    assert_eq!(crs.srs(), "+proj=utm +zone=10 +type=crs");
    assert_eq!(crs.name(), "unknown");
    assert!(crs.warnings().is_empty());
}

#[test]
fn test_deprecated_init_still_constructs() {
    let crs = Crs::from_user_input(proj::DEPRECATED_INIT).unwrap();
    assert_eq!(crs.srs(), "+init=epsg:4326 +type=crs");
    assert!(matches!(
        crs.warnings(),
        [CrsWarning::DeprecatedInitSyntax { .. }]
    ));
    assert!(crs.is_geographic());
    assert_eq!(crs.name(), "WGS 84");
}

#[test]
fn test_registry_inputs() {
    let crs = Crs::from_user_input(("EPSG", "3413")).unwrap();
    assert_eq!(crs.to_string(), "EPSG:3413");
    assert!(crs.is_projected());

    let area = crs.area_of_use().unwrap();
    assert!(area.north > area.south);

    let crs = Crs::from_user_input("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap();
    assert_eq!(crs.to_string(), "OGC:CRS84");
    assert_eq!(crs.axis_info()[0].abbrev, "Lon");
}

#[test]
fn test_ellipsoid_from_keywords_and_registry() {
    let crs = Crs::from_user_input(proj::HRRR_LCC).unwrap();
    let sphere = crs.ellipsoid().unwrap();
    assert!(sphere.is_sphere());
    assert_approx_eq!(sphere.semi_minor_metre(), 6371229.0, 1e-9);

    let crs = Crs::from_epsg(3413).unwrap();
    let wgs84 = crs.ellipsoid().unwrap();
    assert_approx_eq!(wgs84.semi_major_metre, 6378137.0, 1e-9);
    assert_approx_eq!(wgs84.semi_minor_metre(), 6356752.314245, 1e-3);
}

#[test]
fn test_keyword_string_matches_registry_at_lower_confidence() {
    let crs = Crs::from_user_input(proj::WGS84_LONGLAT).unwrap();
    assert_eq!(crs.to_authority(100), None);
    assert_eq!(
        crs.to_authority(70),
        Some(("EPSG".to_string(), "4326".to_string()))
    );
    assert_eq!(crs.to_string(), proj::WGS84_LONGLAT);
}

#[test]
fn test_projjson_input() {
    let crs = Crs::from_json(projjson::WGS84).unwrap();
    assert!(crs.is_geographic());
    assert_eq!(crs.name(), "WGS 84");
    assert_eq!(crs.to_string(), "EPSG:4326");
    assert_eq!(crs.datum().unwrap().name, "World Geodetic System 1984");
}

#[test]
fn test_wkt1_input() {
    let crs = Crs::from_wkt(wkt::UTM_33N_WKT1).unwrap();
    assert_eq!(crs.name(), "WGS 84 / UTM zone 33N");
    assert_eq!(crs.to_string(), "EPSG:32633");
    let operation = crs.coordinate_operation().unwrap();
    assert_eq!(operation.method_name, "Transverse Mercator");
    assert_eq!(operation.param("Longitude of natural origin"), Some(15.0));
}

#[test]
fn test_compound_input() {
    let crs = Crs::from_wkt(wkt::NAD83_NAVD88_COMPOUND).unwrap();
    assert!(crs.is_compound());
    let subs = crs.sub_crs_list().unwrap();
    assert_eq!(subs.len(), 2);
    assert!(subs[0].is_geographic());
    assert!(subs[1].is_vertical());
    assert_eq!(crs.datum().unwrap().name, "North American Datum 1983");
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(Crs::from_user_input(""), Err(CrsError::Empty(_))));
    assert!(matches!(Crs::from_user_input("{}"), Err(CrsError::EmptyJson)));
    assert!(matches!(
        Crs::from_user_input("{\"proj\": "),
        Err(CrsError::InvalidJson(_))
    ));
    assert!(matches!(
        Crs::from_user_input("epsg:999999"),
        Err(CrsError::Engine(_))
    ));
    assert!(matches!(
        CrsInput::from_value(json!(3.5)),
        Err(CrsError::InvalidInput(_))
    ));
}
