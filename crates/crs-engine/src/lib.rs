//! Geodesy engine seam, a PROJ-backed engine and a built-in reference engine.
//!
//! The facade talks to an engine only through [`GeodesyEngine`] and
//! [`EngineCrs`]. With the `proj` feature, [`ProjEngine`] hands definitions
//! to the PROJ library and is the default engine. [`BuiltinEngine`] needs no
//! native library: it understands PROJ keyword strings, authority codes from
//! a small registry, WKT1/WKT2 and PROJJSON, and serves as the engine the
//! test suite runs against. Neither knows projection mathematics.

pub mod keyword;
pub mod methods;
pub mod model;
pub mod projjson;
#[cfg(feature = "proj")]
pub mod proj_engine;
pub mod registry;
pub mod wkt;

use crs_common::{
    AreaOfUse, AxisInfo, CoordinateOperation, CoordinateSystem, CrsError, CrsKind, CrsResult,
    Datum, Ellipsoid, PrimeMeridian, WktVersion,
};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub use keyword::ProjString;
pub use model::CrsModel;
#[cfg(feature = "proj")]
pub use proj_engine::ProjEngine;
pub use registry::{AxisOrder, KnownCrs};
pub use wkt::is_wkt;

/// A CRS object created by an engine.
///
/// Derived CRSs are returned as WKT2_2019 text so callers can wrap them
/// again through the same engine.
pub trait EngineCrs: Send + Sync + fmt::Debug {
    fn kind(&self) -> CrsKind;
    fn name(&self) -> &str;
    fn ellipsoid(&self) -> Option<Ellipsoid>;
    fn datum(&self) -> Option<Datum>;
    fn prime_meridian(&self) -> Option<PrimeMeridian>;
    fn coordinate_system(&self) -> Option<CoordinateSystem>;
    fn axis_info(&self) -> Vec<AxisInfo>;
    fn coordinate_operation(&self) -> Option<CoordinateOperation>;
    fn area_of_use(&self) -> Option<AreaOfUse>;

    /// Authority name and code of a match at `min_confidence` (0-100) or better.
    fn to_authority(&self, min_confidence: u8) -> Option<(String, String)>;

    fn geodetic_crs(&self) -> Option<String>;
    fn source_crs(&self) -> Option<String>;
    fn target_crs(&self) -> Option<String>;
    fn sub_crs_list(&self) -> Vec<String>;

    fn to_wkt(&self, version: WktVersion) -> String;

    /// PROJ keyword string, `None` when PROJ cannot express the CRS.
    fn to_proj4(&self) -> Option<String>;
}

/// Creates CRS objects from definition strings.
pub trait GeodesyEngine: Send + Sync + fmt::Debug {
    fn create(&self, definition: &str) -> CrsResult<Arc<dyn EngineCrs>>;
}

/// Definition formats recognised by [`BuiltinEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    ProjJson,
    Wkt,
    Keyword,
    Authority,
}

impl DefinitionKind {
    pub fn detect(definition: &str) -> Self {
        let text = definition.trim_start();
        if text.starts_with('{') {
            DefinitionKind::ProjJson
        } else if is_wkt(text) {
            DefinitionKind::Wkt
        } else if text.contains('=') {
            DefinitionKind::Keyword
        } else {
            DefinitionKind::Authority
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinEngine;

impl BuiltinEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build the model behind a definition.
    pub fn model(&self, definition: &str) -> CrsResult<CrsModel> {
        let text = definition.trim();
        if text.is_empty() {
            return Err(CrsError::Empty(definition.to_string()));
        }
        let kind = DefinitionKind::detect(text);
        debug!(kind = ?kind, "Creating CRS from definition");
        match kind {
            DefinitionKind::ProjJson => projjson::read(text),
            DefinitionKind::Wkt => wkt::read(text),
            DefinitionKind::Keyword => keyword::read(text),
            DefinitionKind::Authority => {
                let (auth, code) = registry::parse_authority_string(text).ok_or_else(|| {
                    CrsError::Engine(format!("unrecognized definition '{}'", text))
                })?;
                let known = KnownCrs::from_authority(&auth, &code).ok_or_else(|| {
                    CrsError::Engine(format!("crs not found: {}:{}", auth, code))
                })?;
                CrsModel::from_registry(known)
            }
        }
    }
}

impl GeodesyEngine for BuiltinEngine {
    fn create(&self, definition: &str) -> CrsResult<Arc<dyn EngineCrs>> {
        Ok(Arc::new(self.model(definition)?))
    }
}

#[cfg(feature = "proj")]
static DEFAULT_ENGINE: Lazy<Arc<dyn GeodesyEngine>> = Lazy::new(|| Arc::new(ProjEngine));

#[cfg(not(feature = "proj"))]
static DEFAULT_ENGINE: Lazy<Arc<dyn GeodesyEngine>> = Lazy::new(|| Arc::new(BuiltinEngine));

/// Process-wide engine: PROJ with the `proj` feature, the built-in engine
/// otherwise.
pub fn default_engine() -> Arc<dyn GeodesyEngine> {
    DEFAULT_ENGINE.clone()
}
