//! PROJJSON input.

use crs_common::{
    AreaOfUse, AxisInfo, CoordinateOperation, CrsError, CrsResult, Datum, Ellipsoid,
    OperationParameter, PrimeMeridian,
};
use serde_json::{Map, Value};

use crate::model::CrsModel;

type Object = Map<String, Value>;

pub fn read(text: &str) -> CrsResult<CrsModel> {
    let value: Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .ok_or_else(|| CrsError::InvalidJson("PROJJSON must be an object".to_string()))?;
    read_crs(object)
}

fn read_crs(object: &Object) -> CrsResult<CrsModel> {
    let kind = str_field(object, "type")
        .ok_or_else(|| CrsError::Engine("PROJJSON object without 'type'".to_string()))?;
    let name = str_field(object, "name").unwrap_or("unknown");

    let model = match kind {
        "GeographicCRS" => read_geographic(object, name)?,
        "GeodeticCRS" => {
            let cartesian = object
                .get("coordinate_system")
                .and_then(|cs| cs.get("subtype"))
                .and_then(Value::as_str)
                .map(|s| s.eq_ignore_ascii_case("Cartesian"))
                .unwrap_or(false);
            if cartesian {
                CrsModel::geocentric(name, read_datum(object)?, read_prime_meridian(object))
            } else {
                read_geographic(object, name)?
            }
        }
        "ProjectedCRS" => {
            let base = object
                .get("base_crs")
                .and_then(Value::as_object)
                .ok_or_else(|| CrsError::Engine("ProjectedCRS without base_crs".to_string()))?;
            let base = read_crs(base)?;
            let conversion = object
                .get("conversion")
                .and_then(Value::as_object)
                .ok_or_else(|| CrsError::Engine("ProjectedCRS without conversion".to_string()))?;
            CrsModel::projected(name, base, read_operation(conversion), read_axes(object))
        }
        "VerticalCRS" => {
            let datum = object
                .get("datum")
                .and_then(|d| d.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            CrsModel::vertical(name, datum)
        }
        "CompoundCRS" => {
            let components = object
                .get("components")
                .and_then(Value::as_array)
                .ok_or_else(|| CrsError::Engine("CompoundCRS without components".to_string()))?
                .iter()
                .map(|c| {
                    c.as_object()
                        .ok_or_else(|| CrsError::Engine("invalid compound component".to_string()))
                        .and_then(read_crs)
                })
                .collect::<CrsResult<Vec<_>>>()?;
            CrsModel::compound(name, components)
        }
        "BoundCRS" => {
            let nested = |key: &str| -> CrsResult<CrsModel> {
                object
                    .get(key)
                    .and_then(Value::as_object)
                    .ok_or_else(|| CrsError::Engine(format!("BoundCRS without {}", key)))
                    .and_then(read_crs)
            };
            let source = nested("source_crs")?;
            let target = nested("target_crs")?;
            let transformation = object
                .get("transformation")
                .and_then(Value::as_object)
                .ok_or_else(|| CrsError::Engine("BoundCRS without transformation".to_string()))?;
            CrsModel::bound(source, target, read_operation(transformation))
        }
        other => {
            return Err(CrsError::Engine(format!(
                "unsupported PROJJSON type '{}'",
                other
            )))
        }
    };

    Ok(model
        .with_identifier(read_identifier(object))
        .with_area(read_area(object)))
}

fn str_field<'a>(object: &'a Object, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

fn read_geographic(object: &Object, name: &str) -> CrsResult<CrsModel> {
    if let Some(conversion) = object.get("deriving_conversion").and_then(Value::as_object) {
        let base = object
            .get("base_crs")
            .and_then(Value::as_object)
            .ok_or_else(|| CrsError::Engine("derived CRS without base_crs".to_string()))?;
        return Ok(CrsModel::rotated(
            name,
            read_datum(base)?,
            read_prime_meridian(base),
            read_operation(conversion),
        ));
    }
    Ok(CrsModel::geographic(
        name,
        read_datum(object)?,
        read_prime_meridian(object),
        read_axes(object),
    ))
}

fn read_datum(object: &Object) -> CrsResult<Datum> {
    let datum = object
        .get("datum")
        .or_else(|| object.get("datum_ensemble"))
        .and_then(Value::as_object)
        .ok_or_else(|| CrsError::Engine("geodetic CRS without datum".to_string()))?;
    let ellipsoid = datum
        .get("ellipsoid")
        .and_then(Value::as_object)
        .ok_or_else(|| CrsError::Engine("datum without ellipsoid".to_string()))?;
    let ellipsoid_name = str_field(ellipsoid, "name").unwrap_or("unknown");
    let ellipsoid = if let Some(radius) = number(ellipsoid, "radius") {
        Ellipsoid::new(ellipsoid_name, radius, 0.0)
    } else {
        let a = number(ellipsoid, "semi_major_axis")
            .ok_or_else(|| CrsError::Engine("ellipsoid without semi_major_axis".to_string()))?;
        let rf = number(ellipsoid, "inverse_flattening")
            .or_else(|| {
                number(ellipsoid, "semi_minor_axis")
                    .map(|b| if a == b { 0.0 } else { a / (a - b) })
            })
            .unwrap_or(0.0);
        Ellipsoid::new(ellipsoid_name, a, rf)
    };
    Ok(Datum {
        name: str_field(datum, "name").unwrap_or("unknown").to_string(),
        ellipsoid,
    })
}

/// Numeric field, either a bare number or `{"value": n, "unit": ...}`.
fn number(object: &Object, key: &str) -> Option<f64> {
    let value = object.get(key)?;
    value
        .as_f64()
        .or_else(|| value.get("value").and_then(Value::as_f64))
}

fn read_prime_meridian(object: &Object) -> PrimeMeridian {
    object
        .get("prime_meridian")
        .and_then(Value::as_object)
        .map(|pm| PrimeMeridian {
            name: str_field(pm, "name").unwrap_or("Greenwich").to_string(),
            longitude: number(pm, "longitude").unwrap_or(0.0),
        })
        .unwrap_or_else(PrimeMeridian::greenwich)
}

fn read_axes(object: &Object) -> Option<Vec<AxisInfo>> {
    let axes = object
        .get("coordinate_system")?
        .get("axis")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .map(|axis| {
            let unit = match axis.get("unit") {
                Some(Value::String(unit)) => unit.clone(),
                Some(Value::Object(unit)) => str_field(unit, "name").unwrap_or("unknown").to_string(),
                _ => "unknown".to_string(),
            };
            AxisInfo {
                name: str_field(axis, "name").unwrap_or("unknown").to_string(),
                abbrev: str_field(axis, "abbreviation").unwrap_or("").to_string(),
                direction: str_field(axis, "direction").unwrap_or("unknown").to_string(),
                unit_name: unit,
            }
        })
        .collect::<Vec<_>>();
    if axes.is_empty() {
        None
    } else {
        Some(axes)
    }
}

fn read_operation(object: &Object) -> CoordinateOperation {
    CoordinateOperation {
        name: str_field(object, "name").unwrap_or("unknown").to_string(),
        method_name: object
            .get("method")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        params: object
            .get("parameters")
            .and_then(Value::as_array)
            .map(|params| {
                params
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(|param| {
                        Some(OperationParameter {
                            name: str_field(param, "name")?.to_string(),
                            value: number(param, "value")?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn read_identifier(object: &Object) -> Option<(String, String)> {
    let id = object.get("id")?.as_object()?;
    let authority = str_field(id, "authority")?.to_string();
    let code = match id.get("code")? {
        Value::String(code) => code.clone(),
        Value::Number(code) => code.to_string(),
        _ => return None,
    };
    Some((authority, code))
}

fn read_area(object: &Object) -> Option<AreaOfUse> {
    let bbox = object.get("bbox")?.as_object()?;
    Some(AreaOfUse::new(
        str_field(object, "area").unwrap_or("unknown"),
        number(bbox, "west_longitude")?,
        number(bbox, "south_latitude")?,
        number(bbox, "east_longitude")?,
        number(bbox, "north_latitude")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_common::CrsKind;

    #[test]
    fn test_read_geographic() {
        let model = read(
            r#"{
                "type": "GeographicCRS",
                "name": "WGS 84",
                "datum": {
                    "type": "GeodeticReferenceFrame",
                    "name": "World Geodetic System 1984",
                    "ellipsoid": {"name": "WGS 84", "semi_major_axis": 6378137, "inverse_flattening": 298.257223563}
                },
                "coordinate_system": {
                    "subtype": "ellipsoidal",
                    "axis": [
                        {"name": "Geodetic latitude", "abbreviation": "Lat", "direction": "north", "unit": "degree"},
                        {"name": "Geodetic longitude", "abbreviation": "Lon", "direction": "east", "unit": "degree"}
                    ]
                },
                "area": "World.",
                "bbox": {"south_latitude": -90, "west_longitude": -180, "north_latitude": 90, "east_longitude": 180},
                "id": {"authority": "EPSG", "code": 4326}
            }"#,
        )
        .unwrap();
        assert_eq!(model.kind, CrsKind::Geographic);
        assert_eq!(model.identifier, Some(("EPSG".to_string(), "4326".to_string())));
        assert_eq!(model.coordinate_system.as_ref().unwrap().axes[0].abbrev, "Lat");
        assert_eq!(model.area_of_use.as_ref().unwrap().name, "World.");
        assert_eq!(
            model.proj_string().unwrap().render(),
            "+proj=longlat +datum=WGS84 +no_defs"
        );
    }

    #[test]
    fn test_read_projected_sphere() {
        let model = read(
            r#"{
                "type": "ProjectedCRS",
                "name": "unknown",
                "base_crs": {
                    "type": "GeographicCRS",
                    "name": "unknown",
                    "datum": {"name": "unknown", "ellipsoid": {"name": "unknown", "radius": 6371229}}
                },
                "conversion": {
                    "name": "unknown",
                    "method": {"name": "Mercator (variant B)"},
                    "parameters": [
                        {"name": "Latitude of 1st standard parallel", "value": 20},
                        {"name": "Longitude of natural origin", "value": {"value": -100, "unit": "degree"}}
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(model.kind, CrsKind::Projected);
        assert_eq!(
            model.proj_string().unwrap().render(),
            "+proj=merc +lat_ts=20 +lon_0=-100 +R=6371229 +units=m +no_defs"
        );
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(read("[1, 2]"), Err(CrsError::InvalidJson(_))));
        assert!(matches!(read("{\"name\": \"x\"}"), Err(CrsError::Engine(_))));
        assert!(matches!(
            read("{\"type\": \"EngineeringCRS\"}"),
            Err(CrsError::Engine(_))
        ));
        assert!(matches!(read("{not json"), Err(CrsError::InvalidJson(_))));
    }
}
