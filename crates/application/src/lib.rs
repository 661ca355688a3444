//! Application services and ports.

#![forbid(unsafe_code)]

mod license_ports;
mod relay_service;

pub use license_ports::LicenseProvisioner;
pub use relay_service::{RelayOutcome, RelayService};
