//! Search engine: paginated catalog queries, overcast flagging, and logging
//! every hit into the catalog store.

pub mod parse;
pub mod request;

pub use request::{Period, PolygonSpec};

use thiserror::Error;

use crate::catalog::{CatalogStore, PolygonId, QueryRow};
use crate::fetch::Fetcher;
use crate::platform::PlatformConfig;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("polygon named `{0}` was not found in the catalog; provide a stored name or a WKT geometry")]
    UnknownPolygon(String),
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("invalid search URL {0}")]
    InvalidUrl(String),
    /// The hub could not be reached within the retry budget. Try again later.
    #[error("search endpoint unavailable: {url}")]
    Unavailable { url: String },
    #[error("search response has no total result count")]
    MalformedResponse,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl SearchError {
    /// Environmental failure rather than a usage mistake.
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::Unavailable { .. })
    }
}

/// What to search for.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub polygon: PolygonSpec,
    pub period: Period,
    /// Bare product type or full `key:value` clause; `None` uses the platform default.
    pub product_type: Option<String>,
}

/// Most rows the hub returns per page, whatever `rows` asks for.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// Rows per page; clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Cloud cover above this percentage marks a result as overcast.
    pub max_cloud_cover: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_cloud_cover: 90.0,
        }
    }
}

/// Parallel result arrays: index `i` of every vector describes the same product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub dates: Vec<String>,
    pub ids: Vec<String>,
    pub names: Vec<String>,
    pub sizes: Vec<String>,
    pub cloud_covers: Vec<Option<f64>>,
    /// Indices whose cloud cover exceeds the threshold.
    pub overcast_indices: Vec<usize>,
    /// Count reported by the hub.
    pub total_count: u64,
    pub pol_id: Option<PolygonId>,
}

/// A product to consider for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub product_id: String,
    pub full_name: String,
    pub overcast: bool,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.ids
            .iter()
            .zip(&self.names)
            .enumerate()
            .map(|(i, (id, name))| Candidate {
                product_id: id.clone(),
                full_name: name.clone(),
                overcast: self.overcast_indices.contains(&i),
            })
            .collect()
    }
}

/// Resolve a polygon spec to WKT. A literal WKT is stored (unnamed) on first use.
pub async fn resolve_polygon<S: CatalogStore>(store: &S, spec: &PolygonSpec) -> Result<String, SearchError> {
    match spec {
        PolygonSpec::Wkt(wkt) => {
            store.insert_polygon(wkt, "").await?;
            Ok(wkt.clone())
        }
        PolygonSpec::Name(name) => store
            .get_wkt_from_name(name)
            .await?
            .ok_or_else(|| SearchError::UnknownPolygon(name.clone())),
    }
}

/// Run a search, aggregate all pages, flag overcast hits and log every hit
/// in the catalog. Zero hits is an empty `SearchResults`, not an error.
pub async fn search<S, F>(
    store: &S,
    fetcher: &F,
    platform: &PlatformConfig,
    req: &SearchRequest,
    settings: &SearchSettings,
) -> Result<SearchResults, SearchError>
where
    S: CatalogStore,
    F: Fetcher,
{
    let wkt = resolve_polygon(store, &req.polygon).await?;
    let filter = request::type_filter(platform, req.product_type.as_deref());
    let query = request::query_expression(platform.platform_name, &wkt, &req.period, &filter);
    let page_size = settings.page_size.clamp(1, MAX_PAGE_SIZE);

    let first_url = request::page_url(platform.search_url, &query, page_size, 0)?;
    let mut text = fetch_page(fetcher, &first_url).await?;

    if parse::is_empty_result(&text) {
        tracing::warn!("query returned no results: {}", query);
        return Ok(SearchResults::default());
    }
    let total = parse::total_results(&text).ok_or(SearchError::MalformedResponse)?;
    tracing::debug!(total, "hub reported results");

    let mut offset = u64::from(page_size);
    while offset < total {
        let url = request::page_url(platform.search_url, &query, page_size, offset)?;
        text.push_str(&fetch_page(fetcher, &url).await?);
        offset += u64::from(page_size);
    }

    let entries = parse::entries(&text, platform.reports_cloud_cover);
    if entries.len() as u64 != total {
        tracing::warn!(
            parsed = entries.len(),
            total,
            "parsed entry count differs from reported total"
        );
    }

    let overcast_indices: Vec<usize> = if platform.reports_cloud_cover {
        let idx: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.clouds.is_some_and(|c| c > settings.max_cloud_cover))
            .map(|(i, _)| i)
            .collect();
        tracing::info!(
            "{} overcast images (> {}%) were found and will not be downloaded",
            idx.len(),
            settings.max_cloud_cover
        );
        idx
    } else {
        Vec::new()
    };

    let pol_id = store
        .get_pol_id(&wkt)
        .await?
        .ok_or_else(|| anyhow::anyhow!("polygon vanished from catalog: {}", wkt))?;

    let rows: Vec<QueryRow> = entries
        .iter()
        .map(|e| QueryRow {
            platform_name: platform.platform_name.to_string(),
            level_or_type: filter.clone(),
            date: e.date.clone(),
            uuid: e.uuid.clone(),
            full_name: e.name.clone(),
            size: e.size.clone(),
            clouds: e.clouds,
            pol_id,
        })
        .collect();
    store.insert_query_results(&rows).await?;

    tracing::info!("found {} images", entries.len());

    let mut results = SearchResults {
        total_count: total,
        overcast_indices,
        pol_id: Some(pol_id),
        ..SearchResults::default()
    };
    for e in entries {
        results.dates.push(e.date);
        results.ids.push(e.uuid);
        results.names.push(e.name);
        results.sizes.push(e.size);
        results.cloud_covers.push(e.clouds);
    }
    Ok(results)
}

async fn fetch_page<F: Fetcher>(fetcher: &F, url: &str) -> Result<String, SearchError> {
    match fetcher.get(url, "query").await {
        Some(body) => Ok(String::from_utf8_lossy(&body).into_owned()),
        None => Err(SearchError::Unavailable {
            url: url.to_string(),
        }),
    }
}
