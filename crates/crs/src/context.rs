//! The collaborators a [`Crs`] is created with.

use cf_mapping::{CfMapper, MappingTables};
use crs_common::CrsResult;
use crs_engine::{default_engine, GeodesyEngine};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

use crate::classify::CrsInput;
use crate::crs::Crs;

static CF_1_8_TABLES: Lazy<Arc<MappingTables>> =
    Lazy::new(|| Arc::new(MappingTables::cf_1_8().clone()));

/// Geodesy engine and CF mapping tables shared by every CRS created through
/// this context.
///
/// The default context uses [`default_engine`] and the CF-1.8 tables.
#[derive(Debug, Clone)]
pub struct CrsContext {
    engine: Arc<dyn GeodesyEngine>,
    tables: Arc<MappingTables>,
}

impl Default for CrsContext {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            tables: CF_1_8_TABLES.clone(),
        }
    }
}

impl CrsContext {
    pub fn new(engine: Arc<dyn GeodesyEngine>, tables: Arc<MappingTables>) -> Self {
        Self { engine, tables }
    }

    pub fn with_engine(mut self, engine: Arc<dyn GeodesyEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_tables(mut self, tables: MappingTables) -> Self {
        self.tables = Arc::new(tables);
        self
    }

    pub fn engine(&self) -> &Arc<dyn GeodesyEngine> {
        &self.engine
    }

    pub fn tables(&self) -> &MappingTables {
        &self.tables
    }

    pub fn mapper(&self) -> CfMapper<'_> {
        CfMapper::new(&self.tables)
    }

    /// Create a CRS from any supported input shape.
    pub fn create<'a>(&self, input: impl Into<CrsInput<'a>>) -> CrsResult<Crs> {
        let input = input.into();
        let normalized = input.prepare()?;
        debug!(
            shape = input.shape(),
            definition = %normalized.definition,
            "Normalized CRS input"
        );
        Crs::build(self.clone(), normalized)
    }
}
