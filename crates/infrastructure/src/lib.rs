//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_license_provisioner;

pub use http_license_provisioner::{
    GITHUB_API_VERSION, HttpLicenseProvisioner, LicenseApiConfig, LicenseApiMode,
};
