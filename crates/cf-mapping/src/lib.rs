//! Translation between PROJ parameter dictionaries and CF-1.8 grid-mapping
//! attributes.
//!
//! The crate is pure: no I/O, no global mutable state. The shared CF-1.8
//! tables are built lazily once per process and are read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use cf_mapping::{CfMapper, CfSource};
//! use crs_common::{ParamMap, ParamValue};
//!
//! let cf = ParamMap::from([
//!     ("grid_mapping_name", ParamValue::from("mercator")),
//!     ("standard_parallel", ParamValue::from(20.0)),
//! ]);
//! match CfMapper::cf_1_8().cf_to_proj(&cf).unwrap() {
//!     CfSource::Params(translation) => {
//!         assert_eq!(translation.params.get("lat_ts"), Some(&ParamValue::Float(20.0)));
//!     }
//!     CfSource::Wkt(_) => unreachable!(),
//! }
//! ```

pub mod policy;
pub mod tables;
pub mod translate;

pub use policy::{Direction, UnmappedPolicy};
pub use tables::{is_lonlat, MappingTables, LONLAT_ALIASES, UNKNOWN_GRID_MAPPING};
pub use translate::{
    CfMapper, CfSource, Translation, CRS_WKT_KEY, GRID_MAPPING_NAME_KEY, SPATIAL_REF_KEY,
};
