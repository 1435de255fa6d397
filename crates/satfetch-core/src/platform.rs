//! Static per-platform endpoint table.
//!
//! One immutable record per supported hub: where to search, how to address a
//! product payload and its checksum, default credentials and product type.

use thiserror::Error;

/// How a verified payload lands in the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Zip archive, extracted into the output directory.
    Archive,
    /// Single NetCDF file, copied to `{output_dir}/{name}.nc`.
    SingleFile,
}

/// Username/password pair for HTTP basic auth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Name used for lookup (and on the command line).
    pub key: &'static str,
    /// `platformname` value sent in the search query.
    pub platform_name: &'static str,
    pub search_url: &'static str,
    /// Base of the OData product endpoints.
    pub download_base: &'static str,
    pub default_username: &'static str,
    pub default_password: &'static str,
    pub default_product_type: &'static str,
    pub output: OutputFormat,
    /// Search responses carry `cloudcoverpercentage`.
    pub reports_cloud_cover: bool,
}

impl PlatformConfig {
    pub fn download_url(&self, product_id: &str) -> String {
        format!("{}/Products('{}')/$value", self.download_base, product_id)
    }

    pub fn checksum_url(&self, product_id: &str) -> String {
        format!(
            "{}/Products('{}')/Checksum/Value/$value",
            self.download_base, product_id
        )
    }

    pub fn default_credentials(&self) -> Credentials {
        Credentials::new(self.default_username, self.default_password)
    }
}

const SCIHUB_SEARCH: &str = "https://scihub.copernicus.eu/dhus/search";
const SCIHUB_ODATA: &str = "https://scihub.copernicus.eu/dhus/odata/v1";

pub const PLATFORMS: &[PlatformConfig] = &[
    PlatformConfig {
        key: "Sentinel-1",
        platform_name: "Sentinel-1",
        search_url: SCIHUB_SEARCH,
        download_base: SCIHUB_ODATA,
        default_username: "",
        default_password: "",
        default_product_type: "GRD",
        output: OutputFormat::Archive,
        reports_cloud_cover: false,
    },
    PlatformConfig {
        key: "Sentinel-2",
        platform_name: "Sentinel-2",
        search_url: SCIHUB_SEARCH,
        download_base: SCIHUB_ODATA,
        default_username: "",
        default_password: "",
        default_product_type: "S2MSI1C",
        output: OutputFormat::Archive,
        reports_cloud_cover: true,
    },
    PlatformConfig {
        key: "Sentinel-3",
        platform_name: "Sentinel-3",
        search_url: SCIHUB_SEARCH,
        download_base: SCIHUB_ODATA,
        default_username: "",
        default_password: "",
        default_product_type: "OL_1_EFR___",
        output: OutputFormat::Archive,
        reports_cloud_cover: false,
    },
    PlatformConfig {
        key: "Sentinel-3_pre",
        platform_name: "Sentinel-3",
        search_url: "https://scihub.copernicus.eu/s3/search",
        download_base: "https://scihub.copernicus.eu/s3/odata/v1",
        default_username: "s3guest",
        default_password: "s3guest",
        default_product_type: "OL_1_EFR___",
        output: OutputFormat::Archive,
        reports_cloud_cover: false,
    },
    PlatformConfig {
        key: "Sentinel-5",
        platform_name: "Sentinel-5",
        search_url: "https://s5phub.copernicus.eu/dhus/search",
        download_base: "https://s5phub.copernicus.eu/dhus/odata/v1",
        default_username: "s5pguest",
        default_password: "s5pguest",
        default_product_type: "L1B_IR_SIR",
        output: OutputFormat::SingleFile,
        reports_cloud_cover: false,
    },
];

#[derive(Debug, Error)]
#[error("unsupported platform `{name}` (known: {known})")]
pub struct UnsupportedPlatform {
    pub name: String,
    pub known: String,
}

/// Look up a platform record by its key.
pub fn lookup(name: &str) -> Result<&'static PlatformConfig, UnsupportedPlatform> {
    PLATFORMS.iter().find(|p| p.key == name).ok_or_else(|| UnsupportedPlatform {
        name: name.to_string(),
        known: PLATFORMS
            .iter()
            .map(|p| p.key)
            .collect::<Vec<_>>()
            .join(", "),
    })
}
