//! In-process `Fetcher` for unit tests: canned responses keyed by URL suffix.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use super::Fetcher;

#[derive(Default)]
pub(crate) struct MockFetcher {
    routes: Vec<(String, Option<Vec<u8>>)>,
    pub gets: RefCell<Vec<String>>,
    pub downloads: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs ending with `suffix` with `body`.
    pub fn route(mut self, suffix: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.push((suffix.to_string(), Some(body.into())));
        self
    }

    /// URLs ending with `suffix` fail as if retries were exhausted.
    pub fn unavailable(mut self, suffix: &str) -> Self {
        self.routes.push((suffix.to_string(), None));
        self
    }

    fn lookup(&self, url: &str) -> Option<Vec<u8>> {
        self.routes
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .and_then(|(_, body)| body.clone())
    }
}

impl Fetcher for MockFetcher {
    async fn get(&self, url: &str, _label: &str) -> Option<Vec<u8>> {
        self.gets.borrow_mut().push(url.to_string());
        self.lookup(url)
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Option<u64> {
        self.downloads.borrow_mut().push(url.to_string());
        let body = self.lookup(url)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        fs::write(dest, &body).ok()?;
        Some(body.len() as u64)
    }
}

/// A search feed page reporting `total` hits and containing `entries`
/// as `(uuid, identifier, cloud cover)`.
pub(crate) fn feed_page(total: u64, entries: &[(String, String, Option<f64>)]) -> String {
    let mut out = format!(
        "<feed>\n<subtitle>Displaying {} results.</subtitle>\n\
         <opensearch:totalResults>{}</opensearch:totalResults>\n",
        entries.len(),
        total
    );
    for (uuid, name, clouds) in entries {
        out.push_str("<entry>\n");
        out.push_str("<date name=\"beginposition\">2018-04-01T10:00:00.000Z</date>\n");
        if let Some(c) = clouds {
            out.push_str(&format!("<double name=\"cloudcoverpercentage\">{c:.4}</double>\n"));
        }
        out.push_str(&format!("<str name=\"identifier\">{name}</str>\n"));
        out.push_str("<str name=\"size\">1.00 GB</str>\n");
        out.push_str(&format!("<str name=\"uuid\">{uuid}</str>\n"));
        out.push_str("</entry>\n");
    }
    out.push_str("</feed>\n");
    out
}

/// The hub's zero-hits page.
pub(crate) const EMPTY_FEED: &str = "<feed><subtitle>Displaying 0 results. Request done in 0.002 seconds.</subtitle>\
<opensearch:totalResults>0</opensearch:totalResults></feed>";
