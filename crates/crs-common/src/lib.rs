//! Common types shared across the CRS workspace crates.

pub mod error;
pub mod records;
pub mod value;

pub use error::{CrsError, CrsResult, ErrorCategory};
pub use records::{
    AreaOfUse, AxisInfo, CoordinateOperation, CoordinateSystem, CrsKind, Datum, Ellipsoid,
    OperationParameter, PrimeMeridian, WktVersion,
};
pub use value::{format_float, ParamMap, ParamValue};
