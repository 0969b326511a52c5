//! Lookup tables between PROJ parameters and CF-1.8 grid-mapping attributes.
//!
//! The CF-1.8 tables are built once per process and never mutated. Callers that
//! need different coverage build their own [`MappingTables`] and hand it to the
//! mapper instead of touching the shared instance.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Key of the fallback entry in the per-grid-mapping `lon_0`/`k_0` tables.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// PROJ projection names that all mean a plain longitude/latitude system.
pub const LONLAT_ALIASES: [&str; 4] = ["lonlat", "latlon", "longlat", "latlong"];

/// Grid mapping name used when a projection has no CF equivalent.
pub const UNKNOWN_GRID_MAPPING: &str = "unknown";

/// Returns true if `proj_name` is one of the longitude/latitude aliases.
pub fn is_lonlat(proj_name: &str) -> bool {
    LONLAT_ALIASES.contains(&proj_name)
}

static CF_1_8: Lazy<MappingTables> = Lazy::new(MappingTables::build_cf_1_8);

/// Bidirectional PROJ/CF lookup tables.
#[derive(Debug, Clone, Default)]
pub struct MappingTables {
    /// grid_mapping_name → PROJ projection name
    grid_mapping_to_proj: HashMap<String, String>,
    /// PROJ projection name → grid_mapping_name
    proj_to_grid_mapping: HashMap<String, String>,
    /// CF attribute → PROJ parameter
    cf_to_proj_param: HashMap<String, String>,
    /// PROJ parameter → CF attribute
    proj_to_cf_param: HashMap<String, String>,
    /// grid_mapping_name → CF attribute holding `lon_0`
    lon_0: HashMap<String, String>,
    /// grid_mapping_name → CF attribute holding `k_0`
    k_0: HashMap<String, String>,
    /// coordinate operation method name → grid_mapping_name
    method_to_grid_mapping: HashMap<String, String>,
    /// coordinate operation parameter name → CF attribute
    method_param_to_cf: HashMap<String, String>,
}

impl MappingTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared CF-1.8 tables.
    pub fn cf_1_8() -> &'static MappingTables {
        &CF_1_8
    }

    /// Register a grid mapping ⇄ projection pair.
    ///
    /// The inverse entry is overwritten, so when several grid mappings share a
    /// projection the last registration wins the inverse lookup.
    pub fn with_grid_mapping(mut self, grid_mapping_name: &str, proj_name: &str) -> Self {
        self.grid_mapping_to_proj
            .insert(grid_mapping_name.to_string(), proj_name.to_string());
        self.proj_to_grid_mapping
            .insert(proj_name.to_string(), grid_mapping_name.to_string());
        self
    }

    /// Register a CF attribute → PROJ parameter mapping (one direction only).
    pub fn with_cf_param(mut self, cf_name: &str, proj_name: &str) -> Self {
        self.cf_to_proj_param
            .insert(cf_name.to_string(), proj_name.to_string());
        self
    }

    /// Register a PROJ parameter → CF attribute mapping (one direction only).
    pub fn with_proj_param(mut self, proj_name: &str, cf_name: &str) -> Self {
        self.proj_to_cf_param
            .insert(proj_name.to_string(), cf_name.to_string());
        self
    }

    pub fn with_lon_0(mut self, grid_mapping_name: &str, cf_name: &str) -> Self {
        self.lon_0
            .insert(grid_mapping_name.to_string(), cf_name.to_string());
        self
    }

    pub fn with_k_0(mut self, grid_mapping_name: &str, cf_name: &str) -> Self {
        self.k_0
            .insert(grid_mapping_name.to_string(), cf_name.to_string());
        self
    }

    pub fn with_method(mut self, method_name: &str, grid_mapping_name: &str) -> Self {
        self.method_to_grid_mapping
            .insert(method_name.to_string(), grid_mapping_name.to_string());
        self
    }

    pub fn with_method_param(mut self, param_name: &str, cf_name: &str) -> Self {
        self.method_param_to_cf
            .insert(param_name.to_string(), cf_name.to_string());
        self
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn proj_name(&self, grid_mapping_name: &str) -> Option<&str> {
        self.grid_mapping_to_proj
            .get(grid_mapping_name)
            .map(String::as_str)
    }

    pub fn grid_mapping_name(&self, proj_name: &str) -> Option<&str> {
        self.proj_to_grid_mapping.get(proj_name).map(String::as_str)
    }

    pub fn proj_param(&self, cf_name: &str) -> Option<&str> {
        self.cf_to_proj_param.get(cf_name).map(String::as_str)
    }

    pub fn cf_param(&self, proj_name: &str) -> Option<&str> {
        self.proj_to_cf_param.get(proj_name).map(String::as_str)
    }

    /// CF attribute for `lon_0`, falling back to the `DEFAULT` entry.
    pub fn lon_0_attribute(&self, grid_mapping_name: &str) -> Option<&str> {
        self.lon_0
            .get(grid_mapping_name)
            .or_else(|| self.lon_0.get(DEFAULT_KEY))
            .map(String::as_str)
    }

    /// CF attribute for `k_0`, falling back to the `DEFAULT` entry.
    pub fn k_0_attribute(&self, grid_mapping_name: &str) -> Option<&str> {
        self.k_0
            .get(grid_mapping_name)
            .or_else(|| self.k_0.get(DEFAULT_KEY))
            .map(String::as_str)
    }

    pub fn grid_mapping_for_method(&self, method_name: &str) -> Option<&str> {
        self.method_to_grid_mapping
            .get(method_name)
            .map(String::as_str)
    }

    pub fn cf_param_for_method_param(&self, param_name: &str) -> Option<&str> {
        self.method_param_to_cf.get(param_name).map(String::as_str)
    }

    /// All grid mapping names with a PROJ equivalent, sorted.
    pub fn grid_mapping_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.grid_mapping_to_proj.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn build_cf_1_8() -> Self {
        let mut tables = MappingTables::new();

        // Order matters: "stereographic" is registered after
        // "polar_stereographic" so the inverse lookup of "stere" yields it.
        for (grid_mapping_name, proj_name) in [
            ("albers_conical_equal_area", "aea"),
            ("azimuthal_equidistant", "aeqd"),
            ("geostationary", "geos"),
            ("lambert_azimuthal_equal_area", "laea"),
            ("lambert_conformal_conic", "lcc"),
            ("lambert_cylindrical_equal_area", "cea"),
            ("mercator", "merc"),
            ("oblique_mercator", "omerc"),
            ("orthographic", "ortho"),
            ("polar_stereographic", "stere"),
            ("sinusoidal", "sinu"),
            ("stereographic", "stere"),
            ("transverse_mercator", "tmerc"),
            ("vertical_perspective", "nsper"),
            ("rotated_latitude_longitude", "ob_tran"),
            ("latitude_longitude", "latlon"),
        ] {
            tables = tables.with_grid_mapping(grid_mapping_name, proj_name);
        }

        for (cf_name, proj_name) in [
            ("azimuth_of_central_line", "alpha"),
            ("earth_radius", "R"),
            ("false_easting", "x_0"),
            ("false_northing", "y_0"),
            ("grid_north_pole_latitude", "o_lat_p"),
            ("grid_north_pole_longitude", "o_lon_p"),
            ("horizontal_datum_name", "datum"),
            ("inverse_flattening", "rf"),
            ("latitude_of_projection_origin", "lat_0"),
            ("longitude_of_central_meridian", "lon_0"),
            ("longitude_of_prime_meridian", "pm"),
            ("longitude_of_projection_origin", "lon_0"),
            ("north_pole_grid_longitude", "lon_0"),
            ("perspective_point_height", "h"),
            ("prime_meridian_name", "pm"),
            ("reference_ellipsoid_name", "ellps"),
            ("scale_factor_at_central_meridian", "k_0"),
            ("scale_factor_at_projection_origin", "k_0"),
            ("semi_major_axis", "a"),
            ("semi_minor_axis", "b"),
            ("standard_parallel", "lat_1"),
            ("straight_vertical_longitude_from_pole", "lon_0"),
            ("sweep_angle_axis", "sweep"),
            ("towgs84", "towgs84"),
        ] {
            tables = tables.with_cf_param(cf_name, proj_name);
        }

        // lon_0, k_0 and lat_1/lat_2/lat_ts are resolved per grid mapping, so
        // they are deliberately absent here.
        for (proj_name, cf_name) in [
            ("alpha", "azimuth_of_central_line"),
            ("R", "earth_radius"),
            ("x_0", "false_easting"),
            ("y_0", "false_northing"),
            ("o_lat_p", "grid_north_pole_latitude"),
            ("o_lon_p", "grid_north_pole_longitude"),
            ("rf", "inverse_flattening"),
            ("lat_0", "latitude_of_projection_origin"),
            ("lonc", "longitude_of_projection_origin"),
            ("datum", "horizontal_datum_name"),
            ("ellps", "reference_ellipsoid_name"),
            ("pm", "prime_meridian_name"),
            ("h", "perspective_point_height"),
            ("a", "semi_major_axis"),
            ("b", "semi_minor_axis"),
            ("sweep", "sweep_angle_axis"),
            ("towgs84", "towgs84"),
        ] {
            tables = tables.with_proj_param(proj_name, cf_name);
        }

        for (grid_mapping_name, cf_name) in [
            (DEFAULT_KEY, "longitude_of_projection_origin"),
            ("albers_conical_equal_area", "longitude_of_central_meridian"),
            ("lambert_conformal_conic", "longitude_of_central_meridian"),
            ("lambert_cylindrical_equal_area", "longitude_of_central_meridian"),
            ("mercator", "longitude_of_projection_origin"),
            ("polar_stereographic", "straight_vertical_longitude_from_pole"),
            ("rotated_latitude_longitude", "north_pole_grid_longitude"),
            ("sinusoidal", "longitude_of_projection_origin"),
            ("transverse_mercator", "longitude_of_central_meridian"),
        ] {
            tables = tables.with_lon_0(grid_mapping_name, cf_name);
        }

        tables = tables
            .with_k_0(DEFAULT_KEY, "scale_factor_at_projection_origin")
            .with_k_0("transverse_mercator", "scale_factor_at_central_meridian");

        tables = tables.with_method("Transverse Mercator", "transverse_mercator");

        for (param_name, cf_name) in [
            ("Latitude of natural origin", "latitude_of_projection_origin"),
            ("Longitude of natural origin", "longitude_of_central_meridian"),
            ("Latitude of false origin", "latitude_of_projection_origin"),
            ("Longitude of false origin", "longitude_of_central_meridian"),
            ("Scale factor at natural origin", "scale_factor_at_central_meridian"),
            ("Easting at projection centre", "false_easting"),
            ("Northing at projection centre", "false_northing"),
            ("Easting at false origin", "false_easting"),
            ("Northing at false origin", "false_northing"),
            ("False easting", "false_easting"),
            ("False northing", "false_northing"),
        ] {
            tables = tables.with_method_param(param_name, cf_name);
        }

        tables
    }
}
