//! Search inputs: polygon, period, product-type filter, and the query URL.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::SearchError;
use crate::platform::PlatformConfig;

/// Where to search: a literal WKT geometry or the name of a stored polygon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolygonSpec {
    Wkt(String),
    Name(String),
}

impl PolygonSpec {
    /// Anything containing a parenthesis is geometry; everything else is a name.
    pub fn parse(s: &str) -> Self {
        if s.contains('(') {
            PolygonSpec::Wkt(s.to_string())
        } else {
            PolygonSpec::Name(s.to_string())
        }
    }
}

/// Inclusive date range, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub start: String,
    pub end: String,
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"))
}

impl Period {
    /// One date applies to both bounds; two are (start, end); any other shape is an error.
    pub fn from_dates<S: AsRef<str>>(dates: &[S]) -> Result<Self, SearchError> {
        let (start, end) = match dates {
            [single] => (single.as_ref(), single.as_ref()),
            [start, end] => (start.as_ref(), end.as_ref()),
            _ => {
                return Err(SearchError::InvalidPeriod(format!(
                    "expected 1 or 2 dates, got {}",
                    dates.len()
                )))
            }
        };
        for d in [start, end] {
            if !date_re().is_match(d) {
                return Err(SearchError::InvalidPeriod(format!(
                    "`{d}` is not a YYYY-MM-DD date"
                )));
            }
        }
        Ok(Self {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Product-type clause: a full `key:value` clause is used as-is, a bare type
/// becomes `producttype:{type}`, and `None` falls back to the platform default.
pub fn type_filter(platform: &PlatformConfig, product_type: Option<&str>) -> String {
    match product_type {
        Some(t) if t.contains(':') => t.to_string(),
        Some(t) => format!("producttype:{t}"),
        None => {
            let filter = format!("producttype:{}", platform.default_product_type);
            tracing::warn!(
                "product type not specified; using platform default {}",
                filter
            );
            filter
        }
    }
}

/// The `q=` expression for one search.
pub fn query_expression(platform_name: &str, wkt: &str, period: &Period, filter: &str) -> String {
    let (start, end) = (&period.start, &period.end);
    format!(
        "(footprint:\"Intersects({wkt})\") AND \
         (beginPosition:[{start}T00:00:00.000Z TO {end}T23:59:59.999Z] AND \
         endPosition:[{start}T00:00:00.000Z TO {end}T23:59:59.999Z]) AND \
         (platformname:{platform_name} AND {filter})"
    )
}

/// Full search URL for one page.
pub fn page_url(search_url: &str, query: &str, rows: u32, offset: u64) -> Result<String, SearchError> {
    let mut url = Url::parse(search_url)
        .map_err(|e| SearchError::InvalidUrl(format!("{search_url}: {e}")))?;
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("rows", &rows.to_string())
        .append_pair("start", &offset.to_string());
    Ok(url.into())
}
