//! Coordinate reference system facade.
//!
//! Accepts a CRS in any of the usual shapes, normalizes it into one
//! definition string, hands that string to a geodesy engine and converts the
//! result to and from CF grid-mapping attributes.
//!
//! # Example
//!
//! ```rust
//! use crs::Crs;
//!
//! let crs = Crs::from_user_input("+zone=10 +proj=utm +ellps=WGS84").unwrap();
//! assert_eq!(crs.srs(), "+proj=utm +zone=10 +ellps=WGS84 +type=crs");
//! assert_eq!(crs.to_cf().get("grid_mapping_name").unwrap().to_string(), "transverse_mercator");
//! ```

pub mod cf;
pub mod classify;
pub mod context;
pub mod crs;
pub mod normalize;

pub use cf::{CfMapping, CfOptions};
pub use classify::{CrsInput, ToWkt};
pub use context::CrsContext;
pub use crs::Crs;
pub use normalize::{
    format_authority, format_epsg, is_proj, normalize_dict, normalize_string, CrsWarning,
    Normalized,
};

pub use cf_mapping::UnmappedPolicy;
pub use crs_common::{CrsError, CrsKind, CrsResult, ParamMap, ParamValue, WktVersion};
