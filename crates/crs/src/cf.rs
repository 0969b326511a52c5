//! CF grid-mapping conversion for [`Crs`].

use cf_mapping::{CfSource, Direction, UnmappedPolicy, CRS_WKT_KEY};
use crs_common::{CrsKind, CrsResult, ParamMap, WktVersion};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::CrsInput;
use crate::context::CrsContext;
use crate::crs::Crs;

/// Names that carry no information and are not exported as CRS names.
const GENERIC_NAMES: [&str; 2] = ["unknown", "unnamed"];

/// Options for CF conversion in either direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CfOptions {
    /// Dialect of the `crs_wkt` attribute.
    pub wkt_version: WktVersion,
    pub unmapped: UnmappedPolicy,
}

impl CfOptions {
    /// Options matching the classic `errcheck` switch: warn on dropped
    /// parameters when `true`.
    pub fn errcheck(errcheck: bool) -> Self {
        Self {
            unmapped: UnmappedPolicy::from(errcheck),
            ..Self::default()
        }
    }

    pub fn with_wkt_version(mut self, wkt_version: WktVersion) -> Self {
        self.wkt_version = wkt_version;
        self
    }

    pub fn with_unmapped(mut self, unmapped: UnmappedPolicy) -> Self {
        self.unmapped = unmapped;
        self
    }
}

/// CF grid-mapping attributes and the PROJ parameters that had no CF name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CfMapping {
    pub attributes: ParamMap,
    pub skipped: Vec<String>,
}

impl Crs {
    /// CF-1.8 grid-mapping attributes with default options.
    ///
    /// The full WKT is always included under `crs_wkt`.
    pub fn to_cf(&self) -> ParamMap {
        self.cf_mapping(WktVersion::default()).attributes
    }

    pub fn to_cf_with(&self, options: &CfOptions) -> CrsResult<CfMapping> {
        let mapping = self.cf_mapping(options.wkt_version);
        options
            .unmapped
            .check(Direction::ProjToCf, &mapping.skipped)?;
        Ok(mapping)
    }

    fn cf_mapping(&self, wkt_version: WktVersion) -> CfMapping {
        let mut attributes = ParamMap::new();
        attributes.insert(CRS_WKT_KEY, self.to_wkt(wkt_version));

        if !GENERIC_NAMES.contains(&self.name()) {
            match self.kind() {
                CrsKind::Geographic => {
                    attributes.insert("geographic_crs_name", self.name());
                }
                CrsKind::Projected => {
                    attributes.insert("projected_crs_name", self.name());
                }
                _ => {}
            }
        }

        let proj = self.to_dict();
        if proj.is_empty() {
            debug!(srs = %self.srs(), "No PROJ parameters for CF translation");
            return CfMapping {
                attributes,
                skipped: Vec::new(),
            };
        }

        let operation = self.coordinate_operation();
        let translation = self
            .context()
            .mapper()
            .proj_to_cf(proj, operation.as_ref());
        for (name, value) in translation.params {
            attributes.insert(name, value);
        }
        CfMapping {
            attributes,
            skipped: translation.skipped,
        }
    }

    /// Create a CRS from CF grid-mapping attributes with default options.
    pub fn from_cf(cf: &ParamMap) -> CrsResult<Self> {
        CrsContext::default().from_cf(cf, &CfOptions::default())
    }

    pub fn from_cf_with(cf: &ParamMap, options: &CfOptions) -> CrsResult<Self> {
        CrsContext::default().from_cf(cf, options)
    }
}

impl CrsContext {
    /// Create a CRS from CF grid-mapping attributes.
    ///
    /// `crs_wkt` (or the legacy `spatial_ref`) wins over every other attribute.
    pub fn from_cf(&self, cf: &ParamMap, options: &CfOptions) -> CrsResult<Crs> {
        match self.mapper().cf_to_proj(cf)? {
            CfSource::Wkt(wkt) => self.create(CrsInput::Text(wkt)),
            CfSource::Params(translation) => {
                options
                    .unmapped
                    .check(Direction::CfToProj, &translation.skipped)?;
                self.create(CrsInput::Params(translation.params))
            }
        }
    }
}
