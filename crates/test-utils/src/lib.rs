//! Shared test utilities for the CRS workspace.
//!
//! - CRS fixtures: WKT texts, PROJ strings and CF grid-mapping dictionaries
//! - Temporary input files for the command line tool
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::fixtures::{cf, proj, wkt};
//! ```

pub mod files;
pub mod fixtures;

pub use files::*;
pub use fixtures::*;

/// Approximate floating-point equality.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(6356752.3142, 6356752.314245, 1e-3);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        if (left - right).abs() > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n epsilon: `{:?}`",
                left, right, epsilon
            );
        }
    }};
}
