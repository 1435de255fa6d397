//! Types stored in the catalog.

/// Polygon identifier assigned by the store.
pub type PolygonId = i64;

/// A named search area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    pub id: PolygonId,
    /// Display name; empty for polygons first seen as raw WKT.
    pub name: String,
    pub wkt: String,
}

/// One product returned by a search, as logged in the `query` table.
/// Unique on `(pol_id, uuid)`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow {
    pub platform_name: String,
    pub level_or_type: String,
    pub date: String,
    pub uuid: String,
    pub full_name: String,
    pub size: String,
    /// Cloud cover percentage; `None` for platforms that don't report it.
    pub clouds: Option<f64>,
    pub pol_id: PolygonId,
}
