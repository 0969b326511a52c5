//! Engine backed by the PROJ library through the `proj` crate.
//!
//! PROJ parses the definition and exports it as PROJJSON, which is read into
//! a [`CrsModel`]. The native object is dropped before returning, so the
//! result is `Send + Sync` like every other engine CRS.

use std::sync::Arc;

use crs_common::{AreaOfUse, CrsError, CrsResult};
use proj::Proj;
use tracing::debug;

use crate::keyword::ProjString;
use crate::model::CrsModel;
use crate::{projjson, EngineCrs, GeodesyEngine};

#[derive(Debug, Default, Clone, Copy)]
pub struct ProjEngine;

impl ProjEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn model(&self, definition: &str) -> CrsResult<CrsModel> {
        let text = definition.trim();
        if text.is_empty() {
            return Err(CrsError::Empty(definition.to_string()));
        }

        let proj = Proj::new(text).map_err(|e| CrsError::Engine(e.to_string()))?;
        let json = proj
            .to_projjson(Some(false), None, None)
            .map_err(|e| CrsError::Engine(e.to_string()))?;
        let mut model = projjson::read(&json)?;

        if model.area_of_use.is_none() {
            model = model.with_area(area_of_use(&proj));
        }

        // PROJ reports the definition without leading '+'
        if let Some(mut keywords) = proj
            .def()
            .ok()
            .map(|def| ProjString::parse(&def))
            .filter(|keywords| keywords.has("proj"))
        {
            if !keywords.has("type") {
                keywords.push("type", Some("crs".to_string()));
            }
            model = model.with_proj(keywords);
        }

        debug!(name = %model.name, kind = ?model.kind, "Created CRS through PROJ");
        Ok(model)
    }
}

impl GeodesyEngine for ProjEngine {
    fn create(&self, definition: &str) -> CrsResult<Arc<dyn EngineCrs>> {
        Ok(Arc::new(self.model(definition)?))
    }
}

fn area_of_use(proj: &Proj) -> Option<AreaOfUse> {
    match proj.area_of_use() {
        Ok((Some(area), name)) => Some(AreaOfUse {
            name: name.unwrap_or_else(|| "unknown".to_string()),
            west: area.west,
            south: area.south,
            east: area.east,
            north: area.north,
        }),
        _ => None,
    }
}
