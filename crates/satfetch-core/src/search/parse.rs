//! Field extraction from search response bodies.
//!
//! The hub answers with an Atom-like feed. Fields are pulled per `<entry>`
//! so the parallel result arrays can never drift out of alignment.

use std::sync::OnceLock;

use regex::Regex;

struct Patterns {
    no_results: Regex,
    total: Regex,
    entry: Regex,
    date: Regex,
    uuid: Regex,
    identifier: Regex,
    size: Regex,
    clouds: Regex,
}

fn patterns() -> &'static Patterns {
    static P: OnceLock<Patterns> = OnceLock::new();
    P.get_or_init(|| {
        let re = |p: &str| Regex::new(p).expect("search response pattern compiles");
        Patterns {
            no_results: re(r"<subtitle>\s*Displaying 0 results\."),
            total: re(r"<opensearch:totalResults>\s*(\d+)\s*</opensearch:totalResults>"),
            entry: re(r"(?s)<entry>(.*?)</entry>"),
            date: re(r#"<date name="beginposition">([^<]*)</date>"#),
            uuid: re(r#"<str name="uuid">([^<]*)</str>"#),
            identifier: re(r#"<str name="identifier">([^<]*)</str>"#),
            size: re(r#"<str name="size">([^<]*)</str>"#),
            clouds: re(r#"name="cloudcoverpercentage">\s*(\d+(?:\.\d+)?)"#),
        }
    })
}

/// One search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub date: String,
    pub uuid: String,
    pub name: String,
    pub size: String,
    pub clouds: Option<f64>,
}

/// True when the page carries the hub's zero-results marker.
pub fn is_empty_result(body: &str) -> bool {
    patterns().no_results.is_match(body)
}

/// Total hit count reported by the first page.
pub fn total_results(body: &str) -> Option<u64> {
    patterns()
        .total
        .captures(body)
        .and_then(|c| c[1].parse().ok())
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].trim().to_string())
}

/// Extract every complete entry in document order. Entries missing the date,
/// uuid, identifier or size are skipped and logged.
pub fn entries(body: &str, with_clouds: bool) -> Vec<Entry> {
    let p = patterns();
    p.entry
        .captures_iter(body)
        .filter_map(|c| {
            let block = c.get(1).map_or("", |m| m.as_str());
            let fields = (
                capture(&p.date, block),
                capture(&p.uuid, block),
                capture(&p.identifier, block),
                capture(&p.size, block),
            );
            let (Some(date), Some(uuid), Some(name), Some(size)) = fields else {
                tracing::warn!("skipping search entry with missing fields");
                return None;
            };
            let clouds = if with_clouds {
                capture(&p.clouds, block).and_then(|s| s.parse().ok())
            } else {
                None
            };
            Some(Entry {
                date,
                uuid,
                name,
                size,
                clouds,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/" xmlns="http://www.w3.org/2005/Atom">
<subtitle>Displaying 2 results. Request done in 0.01 seconds.</subtitle>
<opensearch:totalResults>2</opensearch:totalResults>
<entry>
<title>S2A_MSIL1C_20180401T105031_N0206_R051_T31UFU_20180401T144530</title>
<date name="beginposition">2018-04-01T10:50:31.026Z</date>
<double name="cloudcoverpercentage">95.4321</double>
<str name="identifier">S2A_MSIL1C_20180401T105031_N0206_R051_T31UFU_20180401T144530</str>
<str name="size">812.33 MB</str>
<str name="uuid">0b1f6b2e-1111-4c4c-9d9d-aaaaaaaaaaaa</str>
</entry>
<entry>
<title>S2A_MSIL1C_20180401T105031_N0206_R051_T31UFV_20180401T144530</title>
<date name="beginposition">2018-04-01T10:50:31.026Z</date>
<double name="cloudcoverpercentage">12.0</double>
<str name="identifier">S2A_MSIL1C_20180401T105031_N0206_R051_T31UFV_20180401T144530</str>
<str name="size">790.01 MB</str>
<str name="uuid">0b1f6b2e-2222-4c4c-9d9d-bbbbbbbbbbbb</str>
</entry>
</feed>"#;

    #[test]
    fn total_and_entries() {
        assert!(!is_empty_result(PAGE));
        assert_eq!(total_results(PAGE), Some(2));
        let e = entries(PAGE, true);
        assert_eq!(e.len(), 2);
        assert_eq!(e[0].uuid, "0b1f6b2e-1111-4c4c-9d9d-aaaaaaaaaaaa");
        assert_eq!(e[0].name, "S2A_MSIL1C_20180401T105031_N0206_R051_T31UFU_20180401T144530");
        assert_eq!(e[0].size, "812.33 MB");
        assert_eq!(e[0].date, "2018-04-01T10:50:31.026Z");
        assert_eq!(e[0].clouds, Some(95.4321));
        assert_eq!(e[1].clouds, Some(12.0));
    }

    #[test]
    fn clouds_ignored_when_not_reported() {
        let e = entries(PAGE, false);
        assert!(e.iter().all(|x| x.clouds.is_none()));
    }

    #[test]
    fn empty_marker_detected() {
        let body = "<feed><subtitle>Displaying 0 results. Request done in 0 seconds.</subtitle>\
                    <opensearch:totalResults>0</opensearch:totalResults></feed>";
        assert!(is_empty_result(body));
        assert!(entries(body, true).is_empty());
    }

    #[test]
    fn incomplete_entry_is_skipped_without_shifting_others() {
        let body = r#"
<entry><str name="uuid">a</str><str name="identifier">A</str><str name="size">1 MB</str></entry>
<entry><date name="beginposition">d2</date><str name="uuid">b</str><str name="identifier">B</str><str name="size">2 MB</str></entry>"#;
        let e = entries(body, false);
        assert_eq!(e.len(), 1);
        assert_eq!((e[0].uuid.as_str(), e[0].name.as_str(), e[0].date.as_str()), ("b", "B", "d2"));
    }
}
