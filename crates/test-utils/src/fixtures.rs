//! Common CRS fixtures.
//!
//! Definitions of the grids that show up in weather and climate data: HRRR
//! (Lambert conformal on a sphere), rotated-pole regional models, polar
//! stereographic sea-ice grids and geostationary imagery.

/// PROJ keyword strings.
pub mod proj {
    pub const UTM_10N: &str = "+proj=utm +zone=10 +ellps=WGS84 +units=m +no_defs +type=crs";

    /// The zone comes before the projection; normalization reorders it.
    pub const UTM_ZONE_FIRST: &str = "+zone=10 +proj=utm";

    pub const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

    pub const HRRR_LCC: &str = "+proj=lcc +lat_0=38.5 +lon_0=262.5 +lat_1=38.5 +lat_2=38.5 +x_0=0 +y_0=0 +R=6371229 +units=m +no_defs +type=crs";

    pub const ROTATED_POLE: &str = "+proj=ob_tran +o_proj=longlat +o_lat_p=37.5 +o_lon_p=-160 +lon_0=180 +R=6371229 +no_defs +type=crs";

    pub const GOES_EAST: &str = "+proj=geos +h=35786023 +lon_0=-75 +sweep=x +ellps=GRS80 +units=m +no_defs +type=crs";

    pub const NSIDC_NORTH: &str = "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs +type=crs";

    pub const DEPRECATED_INIT: &str = "+init=EPSG:4326";

    pub const TOWGS84_BOUND: &str = "+proj=longlat +ellps=intl +towgs84=-87,-98,-121 +no_defs +type=crs";
}

/// WKT texts in the dialects the engine reads.
pub mod wkt {
    pub const WGS84_WKT2: &str = r#"GEOGCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563,LENGTHUNIT["metre",1]]],PRIMEM["Greenwich",0,ANGLEUNIT["degree",0.0174532925199433]],CS[ellipsoidal,2],AXIS["geodetic latitude (Lat)",north,ORDER[1],ANGLEUNIT["degree",0.0174532925199433]],AXIS["geodetic longitude (Lon)",east,ORDER[2],ANGLEUNIT["degree",0.0174532925199433]],USAGE[SCOPE["Horizontal component of 3D system."],AREA["World."],BBOX[-90,-180,90,180]],ID["EPSG",4326]]"#;

    pub const UTM_33N_WKT1: &str = r#"PROJCS["WGS 84 / UTM zone 33N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",15],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["metre",1],AXIS["Easting",EAST],AXIS["Northing",NORTH],AUTHORITY["EPSG","32633"]]"#;

    pub const NAD83_NAVD88_COMPOUND: &str = r#"COMPD_CS["NAD83 + NAVD88 height",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4269"]],VERT_CS["NAVD88 height",VERT_DATUM["North American Vertical Datum 1988",2005],UNIT["metre",1],AXIS["Gravity-related height",UP],AUTHORITY["EPSG","5703"]],AUTHORITY["EPSG","5498"]]"#;
}

/// PROJJSON texts.
pub mod projjson {
    pub const WGS84: &str = r#"{"type": "GeographicCRS", "name": "WGS 84", "datum": {"type": "GeodeticReferenceFrame", "name": "World Geodetic System 1984", "ellipsoid": {"name": "WGS 84", "semi_major_axis": 6378137, "inverse_flattening": 298.257223563}}, "coordinate_system": {"subtype": "ellipsoidal", "axis": [{"name": "Geodetic latitude", "abbreviation": "Lat", "direction": "north", "unit": "degree"}, {"name": "Geodetic longitude", "abbreviation": "Lon", "direction": "east", "unit": "degree"}]}, "id": {"authority": "EPSG", "code": 4326}}"#;
}

/// CF grid-mapping attribute dictionaries.
pub mod cf {
    use crs_common::{ParamMap, ParamValue};

    /// HRRR grid mapping: tangent Lambert conformal on a sphere.
    pub fn hrrr_lambert_conformal() -> ParamMap {
        ParamMap::from([
            ("grid_mapping_name", ParamValue::from("lambert_conformal_conic")),
            ("standard_parallel", ParamValue::from(vec![38.5, 38.5])),
            ("longitude_of_central_meridian", ParamValue::from(262.5)),
            ("latitude_of_projection_origin", ParamValue::from(38.5)),
            ("earth_radius", ParamValue::from(6371229.0)),
        ])
    }

    pub fn rotated_pole() -> ParamMap {
        ParamMap::from([
            ("grid_mapping_name", ParamValue::from("rotated_latitude_longitude")),
            ("grid_north_pole_latitude", ParamValue::from(37.5)),
            ("grid_north_pole_longitude", ParamValue::from(-160.0)),
            ("earth_radius", ParamValue::from(6371229.0)),
        ])
    }

    pub fn polar_stereographic() -> ParamMap {
        ParamMap::from([
            ("grid_mapping_name", ParamValue::from("polar_stereographic")),
            ("straight_vertical_longitude_from_pole", ParamValue::from(-45.0)),
            ("latitude_of_projection_origin", ParamValue::from(90.0)),
            ("standard_parallel", ParamValue::from(70.0)),
            ("false_easting", ParamValue::from(0.0)),
            ("false_northing", ParamValue::from(0.0)),
            ("semi_major_axis", ParamValue::from(6378137.0)),
            ("inverse_flattening", ParamValue::from(298.257223563)),
        ])
    }

    pub fn mercator() -> ParamMap {
        ParamMap::from([
            ("grid_mapping_name", ParamValue::from("mercator")),
            ("standard_parallel", ParamValue::from(20.0)),
            ("longitude_of_projection_origin", ParamValue::from(-100.0)),
            ("earth_radius", ParamValue::from(6371229.0)),
        ])
    }

    pub fn geostationary() -> ParamMap {
        ParamMap::from([
            ("grid_mapping_name", ParamValue::from("geostationary")),
            ("perspective_point_height", ParamValue::from(35786023.0)),
            ("longitude_of_projection_origin", ParamValue::from(-75.0)),
            ("sweep_angle_axis", ParamValue::from("x")),
            ("semi_major_axis", ParamValue::from(6378137.0)),
            ("semi_minor_axis", ParamValue::from(6356752.31414)),
        ])
    }

    pub fn latitude_longitude() -> ParamMap {
        ParamMap::from([
            ("grid_mapping_name", ParamValue::from("latitude_longitude")),
            ("semi_major_axis", ParamValue::from(6378137.0)),
            ("inverse_flattening", ParamValue::from(298.257223563)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cf_fixtures_have_grid_mapping_name() {
        for params in [
            cf::hrrr_lambert_conformal(),
            cf::rotated_pole(),
            cf::polar_stereographic(),
            cf::mercator(),
            cf::geostationary(),
            cf::latitude_longitude(),
        ] {
            assert!(params.contains_key("grid_mapping_name"));
        }
    }

    #[test]
    fn test_proj_fixtures_are_keyword_strings() {
        for text in [proj::UTM_10N, proj::HRRR_LCC, proj::ROTATED_POLE, proj::GOES_EAST] {
            assert!(text.starts_with("+proj="));
            assert!(text.ends_with("+type=crs"));
        }
    }
}
