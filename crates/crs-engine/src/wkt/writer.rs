//! Render a [`CrsModel`] as WKT2 (2015 or 2019) or GDAL-flavoured WKT1.

use crs_common::{
    AxisInfo, CoordinateOperation, CoordinateSystem, CrsKind, Datum, PrimeMeridian, WktVersion,
};

use crate::methods::{self, format_number};
use crate::model::CrsModel;

const DEGREE: &str = "0.0174532925199433";

pub fn write(model: &CrsModel, version: WktVersion) -> String {
    match version {
        WktVersion::Wkt1Gdal => wkt1(model, None, true),
        _ => wkt2(model, version),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

// ============================================================================
// WKT2
// ============================================================================

fn wkt2(model: &CrsModel, version: WktVersion) -> String {
    let body = match model.kind {
        CrsKind::Geographic => match (&model.coordinate_operation, &model.base) {
            (Some(op), Some(base)) => format!(
                "GEOGCRS[{},BASEGEOGCRS[{},{}],{},{}",
                quote(&model.name),
                quote(&base.name),
                geodetic2(base.datum.as_ref(), base.prime_meridian.as_ref()),
                conversion2("DERIVINGCONVERSION", op),
                cs2(model.coordinate_system.as_ref()),
            ),
            _ => format!(
                "GEOGCRS[{},{},{}",
                quote(&model.name),
                geodetic2(model.datum.as_ref(), model.prime_meridian.as_ref()),
                cs2(model.coordinate_system.as_ref()),
            ),
        },
        CrsKind::Geocentric => format!(
            "GEODCRS[{},{},{}",
            quote(&model.name),
            geodetic2(model.datum.as_ref(), model.prime_meridian.as_ref()),
            cs2(model.coordinate_system.as_ref()),
        ),
        CrsKind::Projected => {
            let base = model.base.as_deref();
            let base_name = base.map(|b| b.name.as_str()).unwrap_or("unknown");
            let base_id = base.map(id2).unwrap_or_default();
            let conversion = model
                .coordinate_operation
                .as_ref()
                .map(|op| format!(",{}", conversion2("CONVERSION", op)))
                .unwrap_or_default();
            format!(
                "PROJCRS[{},BASEGEOGCRS[{},{}{}]{},{}",
                quote(&model.name),
                quote(base_name),
                geodetic2(model.datum.as_ref(), model.prime_meridian.as_ref()),
                base_id,
                conversion,
                cs2(model.coordinate_system.as_ref()),
            )
        }
        CrsKind::Vertical => format!(
            "VERTCRS[{},VDATUM[{}],{}",
            quote(&model.name),
            quote(model.vertical_datum.as_deref().unwrap_or("unknown")),
            cs2(model.coordinate_system.as_ref()),
        ),
        CrsKind::Compound => {
            let components: Vec<String> =
                model.components.iter().map(|c| wkt2(c, version)).collect();
            format!("COMPOUNDCRS[{},{}", quote(&model.name), components.join(","))
        }
        CrsKind::Bound => {
            let source = model.source.as_deref().map(|s| wkt2(s, version)).unwrap_or_default();
            let target = model.target.as_deref().map(|t| wkt2(t, version)).unwrap_or_default();
            let transformation = model
                .coordinate_operation
                .as_ref()
                .map(|op| {
                    format!(
                        ",ABRIDGEDTRANSFORMATION[{},METHOD[{}]{}]",
                        quote(&op.name),
                        quote(&op.method_name),
                        parameters2(op)
                    )
                })
                .unwrap_or_default();
            // A bound CRS carries no usage or identifier of its own
            return format!(
                "BOUNDCRS[SOURCECRS[{}],TARGETCRS[{}]{}]",
                source, target, transformation
            );
        }
    };
    format!("{}{}{}]", body, usage2(model, version), id2(model))
}

fn geodetic2(datum: Option<&Datum>, pm: Option<&PrimeMeridian>) -> String {
    let datum = match datum {
        Some(d) => format!(
            "DATUM[{},ELLIPSOID[{},{},{},LENGTHUNIT[\"metre\",1]]]",
            quote(&d.name),
            quote(&d.ellipsoid.name),
            format_number(d.ellipsoid.semi_major_metre),
            format_number(d.ellipsoid.inverse_flattening),
        ),
        None => "DATUM[\"unknown\",ELLIPSOID[\"unknown\",6378137,0,LENGTHUNIT[\"metre\",1]]]"
            .to_string(),
    };
    let pm = pm.cloned().unwrap_or_else(PrimeMeridian::greenwich);
    format!(
        "{},PRIMEM[{},{},ANGLEUNIT[\"degree\",{}]]",
        datum,
        quote(&pm.name),
        format_number(pm.longitude),
        DEGREE
    )
}

fn unit2(unit_name: &str) -> String {
    match unit_name {
        "degree" => format!("ANGLEUNIT[\"degree\",{}]", DEGREE),
        "metre" => "LENGTHUNIT[\"metre\",1]".to_string(),
        other => format!("UNIT[{},1]", quote(other)),
    }
}

fn cs2(cs: Option<&CoordinateSystem>) -> String {
    let Some(cs) = cs else {
        return "CS[ellipsoidal,2]".to_string();
    };
    let axes: Vec<String> = cs
        .axes
        .iter()
        .enumerate()
        .map(|(i, axis)| {
            format!(
                "AXIS[{},{},ORDER[{}],{}]",
                quote(&format!("{} ({})", axis.name, axis.abbrev)),
                axis.direction,
                i + 1,
                unit2(&axis.unit_name)
            )
        })
        .collect();
    format!("CS[{},{}],{}", cs.kind, cs.axes.len(), axes.join(","))
}

fn conversion2(keyword: &str, op: &CoordinateOperation) -> String {
    format!(
        "{}[{},METHOD[{}]{}]",
        keyword,
        quote(&op.name),
        quote(&op.method_name),
        parameters2(op)
    )
}

fn parameters2(op: &CoordinateOperation) -> String {
    op.params
        .iter()
        .map(|param| {
            let unit = parameter_unit(&param.name)
                .map(|u| format!(",{}", u))
                .unwrap_or_default();
            format!(
                ",PARAMETER[{},{}{}]",
                quote(&param.name),
                format_number(param.value),
                unit
            )
        })
        .collect()
}

/// Unit of an EPSG parameter, inferred from its name.
fn parameter_unit(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    if lower.contains("rotation") {
        Some("ANGLEUNIT[\"arc-second\",4.84813681109536E-06]".to_string())
    } else if lower.starts_with("scale difference") {
        Some("SCALEUNIT[\"parts per million\",1E-06]".to_string())
    } else if lower.starts_with("scale factor") {
        Some("SCALEUNIT[\"unity\",1]".to_string())
    } else if lower.contains("latitude") || lower.contains("longitude") {
        Some(unit2("degree"))
    } else if lower.contains("easting") || lower.contains("northing") || lower.contains("translation")
    {
        Some(unit2("metre"))
    } else {
        None
    }
}

fn usage2(model: &CrsModel, version: WktVersion) -> String {
    let Some(area) = &model.area_of_use else {
        return String::new();
    };
    let extent = format!(
        "AREA[{}],BBOX[{},{},{},{}]",
        quote(&area.name),
        format_number(area.south),
        format_number(area.west),
        format_number(area.north),
        format_number(area.east)
    );
    match version {
        WktVersion::Wkt2_2015 => format!(",{}", extent),
        _ => format!(",USAGE[SCOPE[\"unknown\"],{}]", extent),
    }
}

fn id2(model: &CrsModel) -> String {
    match &model.identifier {
        Some((auth, code)) => format!(",ID[{},{}]", quote(auth), code_literal(code)),
        None => String::new(),
    }
}

fn code_literal(code: &str) -> String {
    if code.parse::<u64>().is_ok() {
        code.to_string()
    } else {
        quote(code)
    }
}

// ============================================================================
// WKT1 (GDAL)
// ============================================================================

/// `towgs84` is set when rendering the source of a bound CRS; `extension`
/// controls the `EXTENSION["PROJ4", ...]` node on the outermost CRS.
fn wkt1(model: &CrsModel, towgs84: Option<&CoordinateOperation>, extension: bool) -> String {
    let proj4 = if extension {
        model
            .proj_string()
            .map(|ps| format!(",EXTENSION[\"PROJ4\",{}]", quote(&ps.render())))
            .unwrap_or_default()
    } else {
        String::new()
    };
    let authority = authority1(model);

    match model.kind {
        CrsKind::Geographic => format!(
            "{}{}{}]",
            geogcs1_body(model, towgs84),
            proj4,
            authority
        ),
        CrsKind::Geocentric => format!(
            "GEOCCS[{},{},UNIT[\"metre\",1],AXIS[\"Geocentric X\",OTHER],AXIS[\"Geocentric Y\",OTHER],AXIS[\"Geocentric Z\",NORTH]{}{}]",
            quote(&model.name),
            datum1(model.datum.as_ref(), model.prime_meridian.as_ref(), towgs84),
            proj4,
            authority
        ),
        CrsKind::Projected => {
            let base = match model.base.as_deref() {
                Some(base) => format!(",{}{}]", geogcs1_body(base, towgs84), authority1(base)),
                None => String::new(),
            };
            let projection = model
                .coordinate_operation
                .as_ref()
                .map(projection1)
                .unwrap_or_default();
            format!(
                "PROJCS[{}{}{},UNIT[\"metre\",1]{}{}{}]",
                quote(&model.name),
                base,
                projection,
                axes1(model.coordinate_system.as_ref()),
                proj4,
                authority
            )
        }
        CrsKind::Vertical => format!(
            "VERT_CS[{},VERT_DATUM[{},2005],UNIT[\"metre\",1],AXIS[\"Gravity-related height\",UP]{}]",
            quote(&model.name),
            quote(model.vertical_datum.as_deref().unwrap_or("unknown")),
            authority
        ),
        CrsKind::Compound => {
            let components: Vec<String> = model
                .components
                .iter()
                .map(|c| wkt1(c, None, false))
                .collect();
            format!(
                "COMPD_CS[{},{}{}]",
                quote(&model.name),
                components.join(","),
                authority
            )
        }
        CrsKind::Bound => {
            // WKT1 has no bound CRS: fold the transformation into TOWGS84
            let Some(source) = model.source.as_deref() else {
                return String::new();
            };
            let rendered = wkt1(source, model.coordinate_operation.as_ref(), false);
            match rendered.strip_suffix(']') {
                Some(open) => format!("{}{}]", open, proj4),
                None => rendered,
            }
        }
    }
}

/// `GEOGCS[...` without the closing bracket.
fn geogcs1_body(model: &CrsModel, towgs84: Option<&CoordinateOperation>) -> String {
    format!(
        "GEOGCS[{},{},UNIT[\"degree\",{}]{}",
        quote(&model.name),
        datum1(model.datum.as_ref(), model.prime_meridian.as_ref(), towgs84),
        DEGREE,
        axes1(model.coordinate_system.as_ref())
    )
}

fn datum1(
    datum: Option<&Datum>,
    pm: Option<&PrimeMeridian>,
    towgs84: Option<&CoordinateOperation>,
) -> String {
    let pm = pm.cloned().unwrap_or_else(PrimeMeridian::greenwich);
    let towgs84 = towgs84
        .map(|op| {
            let values: Vec<String> = crate::model::TOWGS84_PARAMS
                .iter()
                .map(|name| format_number(op.param(name).unwrap_or(0.0)))
                .collect();
            format!(",TOWGS84[{}]", values.join(","))
        })
        .unwrap_or_default();
    let (name, ellipsoid, a, rf) = match datum {
        Some(d) => (
            d.name.as_str(),
            d.ellipsoid.name.as_str(),
            d.ellipsoid.semi_major_metre,
            d.ellipsoid.inverse_flattening,
        ),
        None => ("unknown", "unknown", 6378137.0, 0.0),
    };
    format!(
        "DATUM[{},SPHEROID[{},{},{}]{}],PRIMEM[{},{}]",
        quote(name),
        quote(ellipsoid),
        format_number(a),
        format_number(rf),
        towgs84,
        quote(&pm.name),
        format_number(pm.longitude)
    )
}

/// Each axis with a leading comma.
fn axes1(cs: Option<&CoordinateSystem>) -> String {
    cs.map(|cs| cs.axes.iter().map(axis1).collect())
        .unwrap_or_default()
}

fn axis1(axis: &AxisInfo) -> String {
    format!(
        ",AXIS[{},{}]",
        quote(&axis.name),
        axis.direction.to_uppercase()
    )
}

fn projection1(op: &CoordinateOperation) -> String {
    let def = methods::method_by_name(&op.method_name);
    let method = def.map(|d| d.wkt1_name).unwrap_or(op.method_name.as_str());
    let params: String = op
        .params
        .iter()
        .map(|param| {
            let name = def
                .and_then(|d| {
                    d.params
                        .iter()
                        .find(|known| known.epsg_name.eq_ignore_ascii_case(&param.name))
                })
                .map(|known| known.wkt1_name)
                .unwrap_or(param.name.as_str());
            format!(
                ",PARAMETER[{},{}]",
                quote(name),
                format_number(param.value)
            )
        })
        .collect();
    format!(",PROJECTION[{}]{}", quote(method), params)
}

fn authority1(model: &CrsModel) -> String {
    match &model.identifier {
        Some((auth, code)) => format!(",AUTHORITY[{},{}]", quote(auth), quote(code)),
        None => String::new(),
    }
}
