//! In-memory CRS model produced by every front end of the built-in engine.

use crs_common::{
    AreaOfUse, AxisInfo, CoordinateOperation, CoordinateSystem, CrsError, CrsKind, CrsResult,
    Datum, Ellipsoid, OperationParameter, PrimeMeridian, WktVersion,
};

use crate::keyword::{self, ProjString};
use crate::methods;
use crate::registry::{self, AxisOrder, KnownCrs};
use crate::wkt;
use crate::EngineCrs;

/// Parameter names of a `+towgs84` transformation, in PROJ order.
pub const TOWGS84_PARAMS: [&str; 7] = [
    "X-axis translation",
    "Y-axis translation",
    "Z-axis translation",
    "X-axis rotation",
    "Y-axis rotation",
    "Z-axis rotation",
    "Scale difference",
];

pub const GEOCENTRIC_TRANSLATION: &str = "Geocentric translations (geog2D domain)";
pub const POSITION_VECTOR: &str = "Position Vector transformation (geog2D domain)";

#[derive(Debug, Clone, PartialEq)]
pub struct CrsModel {
    pub kind: CrsKind,
    pub name: String,
    pub datum: Option<Datum>,
    pub prime_meridian: Option<PrimeMeridian>,
    pub vertical_datum: Option<String>,
    pub coordinate_system: Option<CoordinateSystem>,
    pub coordinate_operation: Option<CoordinateOperation>,
    pub area_of_use: Option<AreaOfUse>,
    /// Authority name and code.
    pub identifier: Option<(String, String)>,
    /// PROJ keyword definition, when the CRS was built from one.
    pub proj: Option<ProjString>,
    /// Base geographic CRS of a projected or rotated CRS.
    pub base: Option<Box<CrsModel>>,
    pub source: Option<Box<CrsModel>>,
    pub target: Option<Box<CrsModel>>,
    pub components: Vec<CrsModel>,
}

impl CrsModel {
    fn empty(kind: CrsKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            datum: None,
            prime_meridian: None,
            vertical_datum: None,
            coordinate_system: None,
            coordinate_operation: None,
            area_of_use: None,
            identifier: None,
            proj: None,
            base: None,
            source: None,
            target: None,
            components: Vec::new(),
        }
    }

    pub fn geographic(
        name: &str,
        datum: Datum,
        prime_meridian: PrimeMeridian,
        axes: Option<Vec<AxisInfo>>,
    ) -> Self {
        let mut model = Self::empty(CrsKind::Geographic, name);
        model.datum = Some(datum);
        model.prime_meridian = Some(prime_meridian);
        model.coordinate_system = Some(CoordinateSystem {
            kind: "ellipsoidal".to_string(),
            axes: axes.unwrap_or_else(lon_lat_axes),
        });
        model
    }

    /// Geographic CRS derived from a base geographic CRS by a rotation.
    pub fn rotated(
        name: &str,
        datum: Datum,
        prime_meridian: PrimeMeridian,
        operation: CoordinateOperation,
    ) -> Self {
        let base = Self::geographic("unknown", datum.clone(), prime_meridian.clone(), None);
        let mut model = Self::geographic(name, datum, prime_meridian, None);
        model.coordinate_operation = Some(operation);
        model.base = Some(Box::new(base));
        model
    }

    pub fn geocentric(name: &str, datum: Datum, prime_meridian: PrimeMeridian) -> Self {
        let mut model = Self::empty(CrsKind::Geocentric, name);
        model.datum = Some(datum);
        model.prime_meridian = Some(prime_meridian);
        model.coordinate_system = Some(CoordinateSystem {
            kind: "Cartesian".to_string(),
            axes: vec![
                AxisInfo::new("Geocentric X", "X", "geocentricX", "metre"),
                AxisInfo::new("Geocentric Y", "Y", "geocentricY", "metre"),
                AxisInfo::new("Geocentric Z", "Z", "geocentricZ", "metre"),
            ],
        });
        model
    }

    pub fn projected(
        name: &str,
        base: CrsModel,
        operation: CoordinateOperation,
        axes: Option<Vec<AxisInfo>>,
    ) -> Self {
        let mut model = Self::empty(CrsKind::Projected, name);
        model.datum = base.datum.clone();
        model.prime_meridian = base.prime_meridian.clone();
        model.coordinate_operation = Some(operation);
        model.coordinate_system = Some(CoordinateSystem {
            kind: "Cartesian".to_string(),
            axes: axes.unwrap_or_else(|| {
                vec![
                    AxisInfo::new("Easting", "E", "east", "metre"),
                    AxisInfo::new("Northing", "N", "north", "metre"),
                ]
            }),
        });
        model.base = Some(Box::new(base));
        model
    }

    pub fn vertical(name: &str, datum_name: &str) -> Self {
        let mut model = Self::empty(CrsKind::Vertical, name);
        model.vertical_datum = Some(datum_name.to_string());
        model.coordinate_system = Some(CoordinateSystem {
            kind: "vertical".to_string(),
            axes: vec![AxisInfo::new("Gravity-related height", "H", "up", "metre")],
        });
        model
    }

    pub fn compound(name: &str, components: Vec<CrsModel>) -> Self {
        let mut model = Self::empty(CrsKind::Compound, name);
        model.components = components;
        model
    }

    pub fn bound(source: CrsModel, target: CrsModel, transformation: CoordinateOperation) -> Self {
        let mut model = Self::empty(CrsKind::Bound, &source.name);
        model.coordinate_operation = Some(transformation);
        model.source = Some(Box::new(source));
        model.target = Some(Box::new(target));
        model
    }

    /// Bind `source` to WGS 84 with 3 or 7 `+towgs84` parameters.
    pub fn bound_to_wgs84(source: CrsModel, values: &[f64]) -> CrsResult<Self> {
        let method = match values.len() {
            3 => GEOCENTRIC_TRANSLATION,
            7 => POSITION_VECTOR,
            n => {
                return Err(CrsError::InvalidProj(format!(
                    "+towgs84 expects 3 or 7 numbers, got {}",
                    n
                )))
            }
        };
        let target = Self::from_registry(KnownCrs::Epsg4326)?;
        let transformation = CoordinateOperation {
            name: format!("Transformation from {} to WGS84", source.name),
            method_name: method.to_string(),
            params: TOWGS84_PARAMS
                .iter()
                .zip(values)
                .map(|(name, value)| OperationParameter {
                    name: name.to_string(),
                    value: *value,
                })
                .collect(),
        };
        Ok(Self::bound(source, target, transformation))
    }

    /// Model of a registry entry, named and identified by its authority.
    pub fn from_registry(known: KnownCrs) -> CrsResult<Self> {
        let mut model = keyword::model_from_tokens(ProjString::parse(&known.definition()))?;
        let (auth, code) = known.authority();
        model.name = known.name();
        model.identifier = Some((auth.to_string(), code));
        model.area_of_use = Some(known.area_of_use());
        if known.axis_order() == AxisOrder::LatLon {
            if let Some(cs) = model.coordinate_system.as_mut() {
                cs.axes.reverse();
            }
        }
        if let Some(base) = model.base.as_mut() {
            if let Some(datum) = &base.datum {
                base.name = registry_geographic_name(&datum.name).to_string();
            }
        }
        Ok(model)
    }

    pub fn with_proj(mut self, proj: ProjString) -> Self {
        self.proj = Some(proj);
        self
    }

    pub fn with_identifier(mut self, identifier: Option<(String, String)>) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_area(mut self, area: Option<AreaOfUse>) -> Self {
        self.area_of_use = area;
        self
    }

    /// The part of the CRS that carries the horizontal datum.
    pub fn horizontal(&self) -> &CrsModel {
        match self.kind {
            CrsKind::Bound => self.source.as_deref().map(|s| s.horizontal()).unwrap_or(self),
            CrsKind::Compound => self
                .components
                .first()
                .map(|c| c.horizontal())
                .unwrap_or(self),
            _ => self,
        }
    }

    /// PROJ keyword definition, rebuilt from the model when it was not
    /// created from one. `None` when PROJ cannot express the CRS.
    pub fn proj_string(&self) -> Option<ProjString> {
        if let Some(proj) = &self.proj {
            return Some(proj.clone());
        }
        match self.kind {
            CrsKind::Geographic => {
                let mut ps = match &self.coordinate_operation {
                    Some(op) => methods::proj_from_operation(op).ok()?,
                    None => ProjString::parse("+proj=longlat"),
                };
                ps.extend(&self.geodetic_tokens()?);
                ps.push("no_defs", None);
                Some(ps)
            }
            CrsKind::Geocentric => {
                let mut ps = ProjString::parse("+proj=geocent");
                ps.extend(&self.geodetic_tokens()?);
                ps.push("units", Some("m".to_string()));
                ps.push("no_defs", None);
                Some(ps)
            }
            CrsKind::Projected => {
                let mut ps = methods::proj_from_operation(self.coordinate_operation.as_ref()?).ok()?;
                ps.extend(&self.geodetic_tokens()?);
                ps.push("units", Some("m".to_string()));
                ps.push("no_defs", None);
                Some(ps)
            }
            CrsKind::Bound => {
                let mut ps = self.source.as_ref()?.proj_string()?;
                if let Some(values) = self.towgs84() {
                    ps.remove("no_defs");
                    ps.push("towgs84", Some(values));
                    ps.push("no_defs", None);
                }
                Some(ps)
            }
            CrsKind::Compound => self.components.first()?.proj_string(),
            CrsKind::Vertical => None,
        }
    }

    fn geodetic_tokens(&self) -> Option<ProjString> {
        let datum = self.datum.as_ref()?;
        let pm = self
            .prime_meridian
            .clone()
            .unwrap_or_else(PrimeMeridian::greenwich);
        Some(keyword::geodetic_tokens(datum, &pm))
    }

    /// `+towgs84` value of a bound CRS whose transformation PROJ can express.
    fn towgs84(&self) -> Option<String> {
        let op = self.coordinate_operation.as_ref()?;
        if op.method_name != GEOCENTRIC_TRANSLATION && op.method_name != POSITION_VECTOR {
            return None;
        }
        let values: Vec<String> = TOWGS84_PARAMS
            .iter()
            .filter_map(|name| op.param(name))
            .map(methods::format_number)
            .collect();
        if values.len() == 3 || values.len() == 7 {
            Some(values.join(","))
        } else {
            None
        }
    }

    /// Registry entry with the same PROJ definition.
    fn equivalent_registry_entry(&self) -> Option<KnownCrs> {
        if !matches!(
            self.kind,
            CrsKind::Geographic | CrsKind::Projected | CrsKind::Geocentric
        ) {
            return None;
        }
        let ps = self.proj_string()?;
        registry::DEFINITIONS
            .iter()
            .find(|(_, def)| def.equivalent(&ps))
            .map(|(known, _)| *known)
    }
}

fn lon_lat_axes() -> Vec<AxisInfo> {
    vec![
        AxisInfo::new("Longitude", "Lon", "east", "degree"),
        AxisInfo::new("Latitude", "Lat", "north", "degree"),
    ]
}

fn registry_geographic_name(datum_name: &str) -> &'static str {
    match registry::datum_by_name(datum_name).map(|d| d.key) {
        Some("WGS84") => "WGS 84",
        Some("NAD83") => "NAD83",
        Some("NAD27") => "NAD27",
        _ => "unknown",
    }
}

/// Confidence of an authority match found by definition equivalence.
pub const EQUIVALENCE_CONFIDENCE: u8 = 70;

impl EngineCrs for CrsModel {
    fn kind(&self) -> CrsKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn ellipsoid(&self) -> Option<Ellipsoid> {
        self.datum().map(|d| d.ellipsoid)
    }

    fn datum(&self) -> Option<Datum> {
        self.horizontal().datum.clone()
    }

    fn prime_meridian(&self) -> Option<PrimeMeridian> {
        self.horizontal().prime_meridian.clone()
    }

    fn coordinate_system(&self) -> Option<CoordinateSystem> {
        match self.kind {
            CrsKind::Bound => self.source.as_ref()?.coordinate_system.clone(),
            _ => self.coordinate_system.clone(),
        }
    }

    fn axis_info(&self) -> Vec<AxisInfo> {
        match self.kind {
            CrsKind::Compound => self
                .components
                .iter()
                .flat_map(|c| c.axis_info())
                .collect(),
            _ => self
                .coordinate_system()
                .map(|cs| cs.axes)
                .unwrap_or_default(),
        }
    }

    fn coordinate_operation(&self) -> Option<CoordinateOperation> {
        self.coordinate_operation.clone()
    }

    fn area_of_use(&self) -> Option<AreaOfUse> {
        self.area_of_use.clone()
    }

    fn to_authority(&self, min_confidence: u8) -> Option<(String, String)> {
        if let Some(identifier) = &self.identifier {
            return Some(identifier.clone());
        }
        if min_confidence > EQUIVALENCE_CONFIDENCE {
            return None;
        }
        self.equivalent_registry_entry().map(|known| {
            let (auth, code) = known.authority();
            (auth.to_string(), code)
        })
    }

    fn geodetic_crs(&self) -> Option<String> {
        match self.kind {
            CrsKind::Geographic | CrsKind::Geocentric => Some(self.to_wkt(WktVersion::default())),
            CrsKind::Projected => self.base.as_ref().map(|b| b.to_wkt(WktVersion::default())),
            CrsKind::Bound => self.source.as_ref()?.geodetic_crs(),
            CrsKind::Compound => self.components.first()?.geodetic_crs(),
            CrsKind::Vertical => None,
        }
    }

    fn source_crs(&self) -> Option<String> {
        match self.kind {
            CrsKind::Bound => self.source.as_ref().map(|s| s.to_wkt(WktVersion::default())),
            _ => self.base.as_ref().map(|b| b.to_wkt(WktVersion::default())),
        }
    }

    fn target_crs(&self) -> Option<String> {
        self.target.as_ref().map(|t| t.to_wkt(WktVersion::default()))
    }

    fn sub_crs_list(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|c| c.to_wkt(WktVersion::default()))
            .collect()
    }

    fn to_wkt(&self, version: WktVersion) -> String {
        wkt::write(self, version)
    }

    fn to_proj4(&self) -> Option<String> {
        let mut ps = self.proj_string()?;
        ps.push("type", Some("crs".to_string()));
        Some(ps.render())
    }
}
