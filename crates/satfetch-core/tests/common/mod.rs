#![allow(dead_code)]

pub mod hub_server;

use satfetch_core::platform::{OutputFormat, PlatformConfig};

/// A platform record pointing at a local hub. Leaked: platforms are `'static`.
pub fn local_platform(base: &str, output: OutputFormat) -> &'static PlatformConfig {
    let search_url: &'static str = Box::leak(format!("{base}/dhus/search").into_boxed_str());
    let download_base: &'static str = Box::leak(format!("{base}/dhus/odata/v1").into_boxed_str());
    Box::leak(Box::new(PlatformConfig {
        key: "Local",
        platform_name: "Sentinel-3",
        search_url,
        download_base,
        default_username: "guest",
        default_password: "guest",
        default_product_type: "OL_1_EFR___",
        output,
        reports_cloud_cover: false,
    }))
}

/// One-page search feed with the given `(uuid, identifier)` hits.
pub fn feed(entries: &[(&str, &str)]) -> String {
    let mut out = format!(
        "<feed>\n<opensearch:totalResults>{}</opensearch:totalResults>\n",
        entries.len()
    );
    for (uuid, name) in entries {
        out.push_str(&format!(
            "<entry>\n<date name=\"beginposition\">2018-04-01T10:00:00.000Z</date>\n\
             <str name=\"identifier\">{name}</str>\n\
             <str name=\"size\">12 MB</str>\n\
             <str name=\"uuid\">{uuid}</str>\n</entry>\n"
        ));
    }
    out.push_str("</feed>\n");
    out
}
