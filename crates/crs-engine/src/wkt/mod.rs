//! Well-known text: detection, parsing and rendering.

mod parser;
mod reader;
mod writer;

pub use parser::{parse, WktNode, WktValue};
pub use reader::read;
pub use writer::write;

pub(crate) const GEOGRAPHIC_KEYWORDS: &[&str] = &["GEOGCRS", "GEOGRAPHICCRS", "GEOGCS", "BASEGEOGCRS"];
pub(crate) const GEODETIC_KEYWORDS: &[&str] = &["GEODCRS", "GEODETICCRS", "BASEGEODCRS"];
pub(crate) const GEOCENTRIC_KEYWORDS: &[&str] = &["GEOCCS"];
pub(crate) const PROJECTED_KEYWORDS: &[&str] = &["PROJCRS", "PROJECTEDCRS", "PROJCS"];
pub(crate) const VERTICAL_KEYWORDS: &[&str] = &["VERTCRS", "VERTICALCRS", "VERT_CS"];
pub(crate) const COMPOUND_KEYWORDS: &[&str] = &["COMPOUNDCRS", "COMPD_CS"];
pub(crate) const BOUND_KEYWORDS: &[&str] = &["BOUNDCRS"];

/// Every keyword that opens a CRS definition.
pub const CRS_KEYWORDS: &[&str] = &[
    "GEOGCRS",
    "GEOGRAPHICCRS",
    "GEOGCS",
    "BASEGEOGCRS",
    "GEODCRS",
    "GEODETICCRS",
    "BASEGEODCRS",
    "GEOCCS",
    "PROJCRS",
    "PROJECTEDCRS",
    "PROJCS",
    "VERTCRS",
    "VERTICALCRS",
    "VERT_CS",
    "COMPOUNDCRS",
    "COMPD_CS",
    "BOUNDCRS",
    "ENGCRS",
    "ENGINEERINGCRS",
    "LOCAL_CS",
];

/// True when `text` starts with a WKT CRS keyword followed by `[` or `(`.
///
/// PROJ keyword strings can contain brackets in their values
/// (`+towgs84=...`), so the keyword itself has to match.
pub fn is_wkt(text: &str) -> bool {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    if end == 0 {
        return false;
    }
    let (keyword, rest) = text.split_at(end);
    CRS_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(keyword))
        && rest.trim_start().starts_with(['[', '('])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_wkt() {
        assert!(is_wkt("GEOGCRS[\"WGS 84\"]"));
        assert!(is_wkt("  projcs [\"x\"]"));
        assert!(is_wkt("VERT_CS(\"h\")"));
        assert!(!is_wkt("+proj=longlat +datum=WGS84"));
        assert!(!is_wkt("proj=longlat"));
        assert!(!is_wkt("GEOGCRS"));
        assert!(!is_wkt("EPSG:4326"));
        assert!(!is_wkt("DATUM[\"x\"]"));
    }
}
