//! The CRS facade.

use crs_common::{
    AreaOfUse, AxisInfo, CoordinateOperation, CoordinateSystem, CrsError, CrsKind, CrsResult,
    Datum, Ellipsoid, ParamMap, ParamValue, PrimeMeridian, WktVersion,
};
use crs_engine::{is_wkt, EngineCrs};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::classify::{CrsInput, ToWkt};
use crate::context::CrsContext;
use crate::normalize::{
    format_authority, format_epsg, is_proj, normalize_dict, normalize_string, CrsWarning,
    Normalized,
};

/// Length of the definition shown in the [`Crs::describe`] header.
const DESCRIBE_SRS_WIDTH: usize = 50;

/// A coordinate reference system.
///
/// Wraps the canonical definition string together with the engine object
/// parsed from it. Immutable once created; derived CRSs are new values.
#[derive(Debug, Clone)]
pub struct Crs {
    srs: String,
    inner: Arc<dyn EngineCrs>,
    warnings: Vec<CrsWarning>,
    context: CrsContext,
}

impl Crs {
    pub(crate) fn build(context: CrsContext, normalized: Normalized) -> CrsResult<Self> {
        let inner = context.engine().create(&normalized.definition)?;
        Ok(Self {
            srs: normalized.definition,
            inner,
            warnings: normalized.warnings,
            context,
        })
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a CRS from any supported input shape: PROJ string, PROJ
    /// parameter dictionary, JSON, WKT, authority string, EPSG code,
    /// `(authority, code)` pair or anything implementing [`ToWkt`].
    pub fn from_user_input<'a>(input: impl Into<CrsInput<'a>>) -> CrsResult<Self> {
        CrsContext::default().create(input)
    }

    /// PROJ string, JSON, WKT or authority string.
    pub fn from_string(text: &str) -> CrsResult<Self> {
        Self::build(CrsContext::default(), normalize_string(text)?)
    }

    pub fn from_proj4(text: &str) -> CrsResult<Self> {
        if !is_proj(text) {
            return Err(CrsError::InvalidProj(text.to_string()));
        }
        Self::from_string(text)
    }

    pub fn from_wkt(text: &str) -> CrsResult<Self> {
        if !is_wkt(text) {
            return Err(CrsError::InvalidWkt(text.to_string()));
        }
        Self::build(CrsContext::default(), Normalized::new(text))
    }

    pub fn from_epsg(code: i64) -> CrsResult<Self> {
        Self::build(CrsContext::default(), Normalized::new(format_epsg(code)))
    }

    pub fn from_authority(auth_name: &str, auth_code: impl fmt::Display) -> CrsResult<Self> {
        Self::build(
            CrsContext::default(),
            Normalized::new(format_authority(auth_name, auth_code)),
        )
    }

    /// Dictionary of PROJ parameters.
    pub fn from_dict(params: &ParamMap) -> CrsResult<Self> {
        Self::build(CrsContext::default(), normalize_dict(&params.to_json_map())?)
    }

    /// PROJJSON text. Anything but a JSON object is rejected.
    pub fn from_json(text: &str) -> CrsResult<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Self::from_json_dict(&map),
            other => Err(CrsError::InvalidJson(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// PROJJSON object.
    pub fn from_json_dict(map: &Map<String, Value>) -> CrsResult<Self> {
        Self::build(
            CrsContext::default(),
            Normalized::new(serde_json::to_string(map)?),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The canonical definition this CRS was created from.
    pub fn srs(&self) -> &str {
        &self.srs
    }

    /// Warnings raised while normalizing the input.
    pub fn warnings(&self) -> &[CrsWarning] {
        &self.warnings
    }

    pub fn context(&self) -> &CrsContext {
        &self.context
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn kind(&self) -> CrsKind {
        self.inner.kind()
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn is_geographic(&self) -> bool {
        self.kind() == CrsKind::Geographic
    }

    pub fn is_projected(&self) -> bool {
        self.kind() == CrsKind::Projected
    }

    pub fn is_bound(&self) -> bool {
        self.kind() == CrsKind::Bound
    }

    pub fn is_compound(&self) -> bool {
        self.kind() == CrsKind::Compound
    }

    pub fn is_vertical(&self) -> bool {
        self.kind() == CrsKind::Vertical
    }

    pub fn is_geocentric(&self) -> bool {
        self.kind() == CrsKind::Geocentric
    }

    pub fn ellipsoid(&self) -> Option<Ellipsoid> {
        self.inner.ellipsoid()
    }

    pub fn datum(&self) -> Option<Datum> {
        self.inner.datum()
    }

    pub fn prime_meridian(&self) -> Option<PrimeMeridian> {
        self.inner.prime_meridian()
    }

    pub fn coordinate_system(&self) -> Option<CoordinateSystem> {
        self.inner.coordinate_system()
    }

    pub fn axis_info(&self) -> Vec<AxisInfo> {
        self.inner.axis_info()
    }

    pub fn area_of_use(&self) -> Option<AreaOfUse> {
        self.inner.area_of_use()
    }

    pub fn coordinate_operation(&self) -> Option<CoordinateOperation> {
        self.inner.coordinate_operation()
    }

    /// Authority name and code, if a match at `min_confidence` (0-100) exists.
    pub fn to_authority(&self, min_confidence: u8) -> Option<(String, String)> {
        self.inner.to_authority(min_confidence)
    }

    pub fn to_wkt(&self, version: WktVersion) -> String {
        self.inner.to_wkt(version)
    }

    pub fn to_proj4(&self) -> Option<String> {
        self.inner.to_proj4()
    }

    /// PROJ parameters as a dictionary.
    ///
    /// Flags map to `true`, the `type=crs` marker is dropped. Empty when the
    /// CRS cannot be expressed as a PROJ string.
    pub fn to_dict(&self) -> ParamMap {
        let Some(proj) = self.to_proj4() else {
            return ParamMap::new();
        };
        let mut params = ParamMap::new();
        for token in proj.split_whitespace() {
            let token = token.trim_start_matches('+');
            let (key, value) = match token.split_once('=') {
                Some((key, raw)) => (key, ParamValue::parse(raw)),
                None => (token, ParamValue::Bool(true)),
            };
            if key == "type" || value == ParamValue::Bool(false) {
                continue;
            }
            params.insert(key, value);
        }
        params
    }

    // ========================================================================
    // Derived CRSs
    // ========================================================================

    fn derived(&self, definition: Option<String>) -> CrsResult<Option<Crs>> {
        definition
            .map(|wkt| Crs::build(self.context.clone(), Normalized::new(wkt)))
            .transpose()
    }

    /// The geodetic (geographic or geocentric) CRS underlying this one.
    pub fn geodetic_crs(&self) -> CrsResult<Option<Crs>> {
        self.derived(self.inner.geodetic_crs())
    }

    /// Base CRS of a projected CRS, or source CRS of a bound CRS.
    pub fn source_crs(&self) -> CrsResult<Option<Crs>> {
        self.derived(self.inner.source_crs())
    }

    /// Hub CRS of a bound CRS.
    pub fn target_crs(&self) -> CrsResult<Option<Crs>> {
        self.derived(self.inner.target_crs())
    }

    /// Components of a compound CRS.
    pub fn sub_crs_list(&self) -> CrsResult<Vec<Crs>> {
        self.inner
            .sub_crs_list()
            .into_iter()
            .map(|wkt| Crs::build(self.context.clone(), Normalized::new(wkt)))
            .collect()
    }

    // ========================================================================
    // Comparison and rendering
    // ========================================================================

    /// Compare against any input shape. Input that cannot be turned into a
    /// CRS is never equal.
    pub fn equals<'a>(&self, other: impl Into<CrsInput<'a>>) -> bool {
        match self.context.create(other) {
            Ok(other) => *self == other,
            Err(_) => false,
        }
    }

    fn identity(&self) -> String {
        self.to_wkt(WktVersion::Wkt2_2019)
    }

    /// Multi-line summary for diagnostics.
    pub fn describe(&self) -> String {
        let mut axis_lines = String::new();
        let mut source_line = String::new();
        let mut sub_lines = String::new();

        let push_axes = |axes: &[AxisInfo], out: &mut String| {
            for axis in axes {
                out.push_str(&format!("- {}\n", axis));
            }
        };

        let coordinate_system = if self.is_compound() {
            let subs = self.sub_crs_list().unwrap_or_default();
            let mut names = Vec::new();
            sub_lines.push_str("Sub CRS:\n");
            for sub in &subs {
                push_axes(&sub.axis_info(), &mut axis_lines);
                if let Some(cs) = sub.coordinate_system() {
                    names.push(cs.to_string());
                }
                sub_lines.push_str(&format!("- {}\n", sub.name()));
            }
            (!names.is_empty()).then(|| names.join("|"))
        } else {
            let axes = self.axis_info();
            if axes.is_empty() && self.is_bound() {
                match self.source_crs() {
                    Ok(Some(source)) => {
                        push_axes(&source.axis_info(), &mut axis_lines);
                        source_line = format!("Source CRS: {}\n", source.name());
                        source.coordinate_system().map(|cs| cs.to_string())
                    }
                    _ => None,
                }
            } else {
                push_axes(&axes, &mut axis_lines);
                self.coordinate_system().map(|cs| cs.to_string())
            }
        };

        let operation = self
            .coordinate_operation()
            .map(|op| {
                format!(
                    "Coordinate Operation:\n- name: {}\n- method: {}\n",
                    op.name, op.method_name
                )
            })
            .unwrap_or_default();

        let srs = self.to_string();
        let srs = if srs.chars().count() <= DESCRIBE_SRS_WIDTH {
            srs
        } else {
            let head: String = srs.chars().take(DESCRIBE_SRS_WIDTH).collect();
            format!("{} ...", head)
        };

        let undefined = || "undefined".to_string();
        format!(
            "<{type_name}: {srs}>\n\
             Name: {name}\n\
             Axis Info [{coordinate_system}]:\n\
             {axis_lines}\
             Area of Use:\n\
             {area}\n\
             {operation}\
             Datum: {datum}\n\
             - Ellipsoid: {ellipsoid}\n\
             - Prime Meridian: {prime_meridian}\n\
             {source_line}\
             {sub_lines}",
            type_name = self.type_name(),
            name = self.name(),
            coordinate_system = coordinate_system.unwrap_or_else(undefined),
            axis_lines = if axis_lines.is_empty() {
                "- undefined\n".to_string()
            } else {
                axis_lines
            },
            area = self
                .area_of_use()
                .map(|area| area.to_string())
                .unwrap_or_else(|| "- undefined".to_string()),
            datum = self.datum().map(|d| d.to_string()).unwrap_or_else(undefined),
            ellipsoid = self
                .ellipsoid()
                .map(|e| e.to_string())
                .unwrap_or_else(undefined),
            prime_meridian = self
                .prime_meridian()
                .map(|pm| pm.to_string())
                .unwrap_or_else(undefined),
        )
    }
}

impl fmt::Display for Crs {
    /// `AUTH:CODE` for an exact authority match, otherwise the canonical
    /// definition.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_authority(100) {
            Some((auth_name, auth_code)) => write!(f, "{}:{}", auth_name, auth_code),
            None => f.write_str(&self.srs),
        }
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Crs {}

impl Hash for Crs {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl ToWkt for Crs {
    fn to_wkt(&self) -> String {
        Crs::to_wkt(self, WktVersion::default())
    }
}

impl std::str::FromStr for Crs {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crs::from_string(s)
    }
}
