//! Build a [`CrsModel`] from a parsed WKT node tree.

use crs_common::{
    AreaOfUse, AxisInfo, CoordinateOperation, CrsError, CrsResult, Datum, Ellipsoid,
    OperationParameter, PrimeMeridian,
};

use super::parser::{self, WktNode};
use super::{
    BOUND_KEYWORDS, COMPOUND_KEYWORDS, GEOCENTRIC_KEYWORDS, GEODETIC_KEYWORDS,
    GEOGRAPHIC_KEYWORDS, PROJECTED_KEYWORDS, VERTICAL_KEYWORDS,
};
use crate::keyword;
use crate::methods::{self, MethodDef};
use crate::model::CrsModel;
use crate::registry;

const BASE_KEYWORDS: &[&str] = &["BASEGEOGCRS", "BASEGEODCRS", "GEOGCS", "BASEGEOGRAPHICCRS"];
const DATUM_KEYWORDS: &[&str] = &["DATUM", "GEODETICDATUM", "TRF"];
const ENSEMBLE_KEYWORDS: &[&str] = &["ENSEMBLE", "DATUMENSEMBLE"];
const UNIT_KEYWORDS: &[&str] = &["ANGLEUNIT", "LENGTHUNIT", "UNIT"];

pub fn read(text: &str) -> CrsResult<CrsModel> {
    let root = parser::parse(text)?;
    read_crs(&root)
}

fn read_crs(node: &WktNode) -> CrsResult<CrsModel> {
    if let Some(model) = read_extension(node)? {
        return Ok(model);
    }

    let model = if node.is(GEOGRAPHIC_KEYWORDS) {
        read_geographic(node)?
    } else if node.is(GEODETIC_KEYWORDS) {
        let ellipsoidal = node
            .child(&["CS"])
            .and_then(|cs| cs.text(0))
            .map(|kind| kind.eq_ignore_ascii_case("ellipsoidal"))
            .unwrap_or(false);
        if ellipsoidal {
            read_geographic(node)?
        } else {
            read_geocentric(node)?
        }
    } else if node.is(GEOCENTRIC_KEYWORDS) {
        read_geocentric(node)?
    } else if node.is(PROJECTED_KEYWORDS) {
        read_projected(node)?
    } else if node.is(VERTICAL_KEYWORDS) {
        let datum = node
            .child(&["VDATUM", "VERT_DATUM", "VERTICALDATUM", "VRF"])
            .map(|d| d.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        CrsModel::vertical(node.name(), &datum)
    } else if node.is(COMPOUND_KEYWORDS) {
        let components = node
            .nodes()
            .filter(|child| is_crs_node(child))
            .map(read_crs)
            .collect::<CrsResult<Vec<_>>>()?;
        if components.is_empty() {
            return Err(CrsError::InvalidWkt(
                "compound CRS without components".to_string(),
            ));
        }
        CrsModel::compound(node.name(), components)
    } else if node.is(BOUND_KEYWORDS) {
        read_bound(node)?
    } else {
        return Err(CrsError::InvalidWkt(format!(
            "unsupported CRS type '{}'",
            node.keyword
        )));
    };

    Ok(model
        .with_identifier(read_identifier(node))
        .with_area(read_area(node)))
}

fn is_crs_node(node: &WktNode) -> bool {
    super::CRS_KEYWORDS.iter().any(|k| node.keyword.eq_ignore_ascii_case(k))
}

/// WKT1 carrying the original PROJ definition in `EXTENSION["PROJ4", ...]`.
fn read_extension(node: &WktNode) -> CrsResult<Option<CrsModel>> {
    let Some(definition) = node
        .children(&["EXTENSION"])
        .find(|ext| ext.text(0).map(|t| t.eq_ignore_ascii_case("PROJ4")).unwrap_or(false))
        .and_then(|ext| ext.text(1))
    else {
        return Ok(None);
    };

    let mut model = keyword::read(definition)?;
    let name = node.name().to_string();
    rename_horizontal(&mut model, &name, read_axes(node));
    model.name = name;
    Ok(Some(
        model
            .with_identifier(read_identifier(node))
            .with_area(read_area(node)),
    ))
}

/// Apply the WKT name and axes to the part of the model carrying the datum.
fn rename_horizontal(model: &mut CrsModel, name: &str, axes: Option<Vec<AxisInfo>>) {
    if let Some(source) = model.source.as_deref_mut() {
        return rename_horizontal(source, name, axes);
    }
    model.name = name.to_string();
    if let (Some(axes), Some(cs)) = (axes, model.coordinate_system.as_mut()) {
        if axes.len() == cs.axes.len() {
            cs.axes = axes;
        }
    }
}

fn read_geographic(node: &WktNode) -> CrsResult<CrsModel> {
    if let Some(conversion) = node.child(&["DERIVINGCONVERSION"]) {
        let base = node
            .child(BASE_KEYWORDS)
            .ok_or_else(|| CrsError::InvalidWkt("derived CRS without base CRS".to_string()))?;
        let operation = read_operation(conversion);
        return Ok(CrsModel::rotated(
            node.name(),
            read_datum(base)?,
            read_prime_meridian(base),
            operation,
        ));
    }
    Ok(CrsModel::geographic(
        node.name(),
        read_datum(node)?,
        read_prime_meridian(node),
        read_axes(node),
    ))
}

fn read_geocentric(node: &WktNode) -> CrsResult<CrsModel> {
    Ok(CrsModel::geocentric(
        node.name(),
        read_datum(node)?,
        read_prime_meridian(node),
    ))
}

fn read_projected(node: &WktNode) -> CrsResult<CrsModel> {
    let base_node = node
        .child(BASE_KEYWORDS)
        .ok_or_else(|| CrsError::InvalidWkt("projected CRS without base CRS".to_string()))?;
    let base = read_geographic(base_node)?.with_identifier(read_identifier(base_node));

    let operation = match node.child(&["CONVERSION"]) {
        Some(conversion) => read_operation(conversion),
        None => {
            // WKT1 keeps PROJECTION and PARAMETER on the PROJCS node itself
            let method = node
                .child(&["PROJECTION"])
                .ok_or_else(|| CrsError::InvalidWkt("projected CRS without PROJECTION".to_string()))?;
            wkt1_operation(method.name(), read_parameters(node))
        }
    };

    Ok(CrsModel::projected(
        node.name(),
        base,
        operation,
        read_axes(node),
    ))
}

/// Translate WKT1 projection and parameter names to their EPSG names.
///
/// Left as written when no catalogue method knows every parameter.
fn wkt1_operation(projection: &str, params: Vec<OperationParameter>) -> CoordinateOperation {
    let epsg_param = |def: &MethodDef, wkt1_name: &str| {
        def.params
            .iter()
            .find(|mp| mp.wkt1_name.eq_ignore_ascii_case(wkt1_name))
            .map(|mp| mp.epsg_name)
    };
    let def = methods::METHODS.iter().find(|def| {
        def.wkt1_name.eq_ignore_ascii_case(projection)
            && params.iter().all(|param| epsg_param(def, &param.name).is_some())
    });
    let Some(def) = def else {
        return CoordinateOperation {
            name: "unknown".to_string(),
            method_name: projection.to_string(),
            params,
        };
    };
    CoordinateOperation {
        name: "unknown".to_string(),
        method_name: def.method_name.to_string(),
        params: params
            .into_iter()
            .map(|param| OperationParameter {
                name: epsg_param(def, &param.name)
                    .map(str::to_string)
                    .unwrap_or(param.name),
                value: param.value,
            })
            .collect(),
    }
}

fn read_bound(node: &WktNode) -> CrsResult<CrsModel> {
    let inner = |keyword: &str| -> CrsResult<CrsModel> {
        let wrapper = node
            .child(&[keyword])
            .ok_or_else(|| CrsError::InvalidWkt(format!("BOUNDCRS without {}", keyword)))?;
        let crs = wrapper
            .nodes()
            .find(|child| is_crs_node(child))
            .ok_or_else(|| CrsError::InvalidWkt(format!("empty {}", keyword)))?;
        read_crs(crs)
    };
    let source = inner("SOURCECRS")?;
    let target = inner("TARGETCRS")?;
    let transformation = node
        .child(&["ABRIDGEDTRANSFORMATION"])
        .map(read_operation)
        .ok_or_else(|| CrsError::InvalidWkt("BOUNDCRS without transformation".to_string()))?;
    Ok(CrsModel::bound(source, target, transformation))
}

fn read_operation(node: &WktNode) -> CoordinateOperation {
    CoordinateOperation {
        name: node.name().to_string(),
        method_name: node
            .child(&["METHOD", "PROJECTION"])
            .map(|m| m.name().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        params: read_parameters(node),
    }
}

fn read_parameters(node: &WktNode) -> Vec<OperationParameter> {
    node.children(&["PARAMETER"])
        .filter_map(|param| {
            Some(OperationParameter {
                name: param.text(0)?.to_string(),
                value: param.number(1)?,
            })
        })
        .collect()
}

fn read_datum(node: &WktNode) -> CrsResult<Datum> {
    let datum = node
        .child(DATUM_KEYWORDS)
        .or_else(|| node.child(ENSEMBLE_KEYWORDS))
        .ok_or_else(|| CrsError::InvalidWkt(format!("{} without DATUM", node.keyword)))?;
    let ellipsoid = datum
        .child(&["ELLIPSOID", "SPHEROID"])
        .ok_or_else(|| CrsError::InvalidWkt("DATUM without ELLIPSOID".to_string()))?;
    let semi_major = ellipsoid
        .number(1)
        .ok_or_else(|| CrsError::InvalidWkt("ELLIPSOID without semi-major axis".to_string()))?;
    // WKT1 spellings such as WGS_1984 resolve to the registry name
    let name = registry::datum_by_name(datum.name())
        .map(|def| def.name.to_string())
        .unwrap_or_else(|| datum.name().to_string());
    Ok(Datum {
        name,
        ellipsoid: Ellipsoid::new(
            ellipsoid.name(),
            semi_major,
            ellipsoid.number(2).unwrap_or(0.0),
        ),
    })
}

fn read_prime_meridian(node: &WktNode) -> PrimeMeridian {
    node.child(&["PRIMEM", "PRIMEMERIDIAN"])
        .map(|pm| PrimeMeridian {
            name: pm.name().to_string(),
            longitude: pm.number(1).unwrap_or(0.0),
        })
        .unwrap_or_else(PrimeMeridian::greenwich)
}

/// Axes declared on the node; `None` when it declares none.
fn read_axes(node: &WktNode) -> Option<Vec<AxisInfo>> {
    let node_unit = node
        .child(UNIT_KEYWORDS)
        .map(|u| normalize_unit(u.name()));
    let axes: Vec<AxisInfo> = node
        .children(&["AXIS"])
        .map(|axis| {
            let raw = axis.name();
            let (name, abbrev) = match raw.strip_suffix(')').and_then(|r| r.rsplit_once(" (")) {
                Some((name, abbrev)) => (name.to_string(), abbrev.to_string()),
                None => (raw.to_string(), abbreviation(raw)),
            };
            let direction = axis.text(1).unwrap_or("unknown").to_lowercase();
            let unit = axis
                .child(UNIT_KEYWORDS)
                .map(|u| normalize_unit(u.name()))
                .or_else(|| node_unit.clone())
                .unwrap_or_else(|| default_unit(&direction));
            AxisInfo {
                name,
                abbrev,
                direction: match direction.as_str() {
                    "geocentricx" => "geocentricX".to_string(),
                    "geocentricy" => "geocentricY".to_string(),
                    "geocentricz" => "geocentricZ".to_string(),
                    _ => direction,
                },
                unit_name: unit,
            }
        })
        .collect();
    if axes.is_empty() {
        None
    } else {
        Some(axes)
    }
}

fn abbreviation(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "longitude" | "geodetic longitude" | "lon" | "long" => "Lon".to_string(),
        "latitude" | "geodetic latitude" | "lat" => "Lat".to_string(),
        "easting" | "x" => "E".to_string(),
        "northing" | "y" => "N".to_string(),
        "gravity-related height" | "height" => "H".to_string(),
        other => other
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default(),
    }
}

fn normalize_unit(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "meter" | "metre" | "m" => "metre".to_string(),
        "degree" | "degrees" => "degree".to_string(),
        other => other.to_string(),
    }
}

fn default_unit(direction: &str) -> String {
    match direction {
        "east" | "west" | "north" | "south" => "degree".to_string(),
        _ => "metre".to_string(),
    }
}

fn read_identifier(node: &WktNode) -> Option<(String, String)> {
    let id = node.child(&["ID", "AUTHORITY"])?;
    let auth = id.text(0)?.to_string();
    let code = match id.number(1) {
        Some(n) if id.text(1).is_none() => format!("{}", n),
        _ => id.text(1)?.to_string(),
    };
    Some((auth, code))
}

/// `USAGE[SCOPE[..],AREA[..],BBOX[s,w,n,e]]`, or `AREA`/`BBOX` directly on
/// the node as in WKT2_2015.
fn read_area(node: &WktNode) -> Option<AreaOfUse> {
    let holder = node.child(&["USAGE"]).unwrap_or(node);
    let bbox = holder.child(&["BBOX"])?;
    let name = holder
        .child(&["AREA"])
        .map(|a| a.name().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    Some(AreaOfUse::new(
        &name,
        bbox.number(1)?,
        bbox.number(0)?,
        bbox.number(3)?,
        bbox.number(2)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::CrsKind;

    const WKT1_UTM: &str = r#"PROJCS["WGS 84 / UTM zone 33N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",15],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["metre",1],AXIS["Easting",EAST],AXIS["Northing",NORTH],AUTHORITY["EPSG","32633"]]"#;

    #[test]
    fn test_read_wkt1_projected() {
        let model = read(WKT1_UTM).unwrap();
        assert_eq!(model.kind, CrsKind::Projected);
        assert_eq!(model.name, "WGS 84 / UTM zone 33N");
        assert_eq!(
            model.identifier,
            Some(("EPSG".to_string(), "32633".to_string()))
        );
        let op = model.coordinate_operation.as_ref().unwrap();
        assert_eq!(op.method_name, "Transverse Mercator");
        assert_eq!(op.params.len(), 5);
        assert_eq!(op.param("Scale factor at natural origin"), Some(0.9996));
        assert_eq!(
            model.datum.as_ref().unwrap().name,
            "World Geodetic System 1984"
        );
        let proj = model.proj_string().unwrap().render();
        assert_eq!(
            proj,
            "+proj=tmerc +lat_0=0 +lon_0=15 +k_0=0.9996 +x_0=500000 +y_0=0 +datum=WGS84 +units=m +no_defs"
        );
        let base = model.base.as_ref().unwrap();
        assert_eq!(base.identifier, Some(("EPSG".to_string(), "4326".to_string())));
    }

    #[test]
    fn test_read_wkt2_geographic_with_usage() {
        let model = read(
            r#"GEOGCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563,LENGTHUNIT["metre",1]]],PRIMEM["Greenwich",0,ANGLEUNIT["degree",0.0174532925199433]],CS[ellipsoidal,2],AXIS["geodetic latitude (Lat)",north,ORDER[1],ANGLEUNIT["degree",0.0174532925199433]],AXIS["geodetic longitude (Lon)",east,ORDER[2],ANGLEUNIT["degree",0.0174532925199433]],USAGE[SCOPE["Horizontal component of 3D system."],AREA["World."],BBOX[-90,-180,90,180]],ID["EPSG",4326]]"#,
        )
        .unwrap();
        assert_eq!(model.kind, CrsKind::Geographic);
        let axes = &model.coordinate_system.as_ref().unwrap().axes;
        assert_eq!(axes[0].name, "geodetic latitude");
        assert_eq!(axes[0].abbrev, "Lat");
        assert_eq!(axes[0].unit_name, "degree");
        let area = model.area_of_use.as_ref().unwrap();
        assert_eq!(area.bounds(), (-180.0, -90.0, 180.0, 90.0));
        assert_eq!(area.name, "World.");
        assert_eq!(
            model.proj_string().unwrap().render(),
            "+proj=longlat +datum=WGS84 +no_defs"
        );
    }

    #[test]
    fn test_read_extension_keeps_definition() {
        let model = read(
            r#"PROJCS["unnamed",GEOGCS["unknown",DATUM["unknown",SPHEROID["unknown",6371229,0]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic_1SP"],PARAMETER["latitude_of_origin",25],UNIT["metre",1],EXTENSION["PROJ4","+proj=lcc +lat_1=25 +lat_0=25 +lon_0=265 +R=6371229 +no_defs"]]"#,
        )
        .unwrap();
        assert_eq!(model.name, "unnamed");
        assert_eq!(
            model.proj.as_ref().unwrap().render(),
            "+proj=lcc +lat_1=25 +lat_0=25 +lon_0=265 +R=6371229 +no_defs"
        );
    }

    #[test]
    fn test_read_compound_and_vertical() {
        let model = read(
            r#"COMPD_CS["NAD83 + NAVD88 height",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],VERT_CS["NAVD88 height",VERT_DATUM["North American Vertical Datum 1988",2005],UNIT["metre",1],AXIS["Gravity-related height",UP]]]"#,
        )
        .unwrap();
        assert_eq!(model.kind, CrsKind::Compound);
        assert_eq!(model.components.len(), 2);
        assert_eq!(model.components[1].kind, CrsKind::Vertical);
        assert_eq!(
            model.components[1].vertical_datum.as_deref(),
            Some("North American Vertical Datum 1988")
        );
        assert_eq!(
            model.proj_string().unwrap().render(),
            "+proj=longlat +datum=NAD83 +no_defs"
        );
    }

    #[test]
    fn test_read_bound() {
        let model = read(
            r#"BOUNDCRS[SOURCECRS[GEOGCRS["unknown",DATUM["Unknown based on International 1924 ellipsoid",ELLIPSOID["International 1924",6378388,297]],CS[ellipsoidal,2],AXIS["longitude",east],AXIS["latitude",north]]],TARGETCRS[GEOGCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563]],CS[ellipsoidal,2],AXIS["latitude",north],AXIS["longitude",east]]],ABRIDGEDTRANSFORMATION["Transformation from unknown to WGS84",METHOD["Geocentric translations (geog2D domain)"],PARAMETER["X-axis translation",-87],PARAMETER["Y-axis translation",-98],PARAMETER["Z-axis translation",-121]]]"#,
        )
        .unwrap();
        assert_eq!(model.kind, CrsKind::Bound);
        assert_eq!(
            model.proj_string().unwrap().render(),
            "+proj=longlat +ellps=intl +towgs84=-87,-98,-121 +no_defs"
        );
    }

    #[test]
    fn test_read_unsupported() {
        assert!(matches!(
            read(r#"ENGCRS["local"]"#),
            Err(CrsError::InvalidWkt(_))
        ));
        assert!(matches!(
            read(r#"GEOGCRS["no datum",CS[ellipsoidal,2]]"#),
            Err(CrsError::InvalidWkt(_))
        ));
    }
}
