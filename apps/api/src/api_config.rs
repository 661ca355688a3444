use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use seatrelay_core::AppError;
use seatrelay_infrastructure::{LicenseApiConfig, LicenseApiMode};
use tracing_subscriber::EnvFilter;

const DEFAULT_LICENSE_API_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub license_api: LicenseApiConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 8080,
        };

        let base_url = lookup("LICENSE_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LICENSE_API_BASE_URL.to_owned());

        let (mode, token) = match lookup("LICENSE_API_MODE")
            .unwrap_or_else(|| "organization".to_owned())
            .as_str()
        {
            "organization" => (
                LicenseApiMode::OrganizationSeats {
                    organization: required_non_empty(&lookup, "GITHUB_ORG")?,
                },
                required_non_empty(&lookup, "GITHUB_API_TOKEN")?,
            ),
            "user" => (
                LicenseApiMode::UserSeat,
                required_non_empty(&lookup, "GITHUB_TOKEN")?,
            ),
            other => {
                return Err(AppError::Validation(format!(
                    "LICENSE_API_MODE must be either 'organization' or 'user', got '{other}'"
                )));
            }
        };

        Ok(Self {
            api_host,
            api_port,
            license_api: LicenseApiConfig::new(base_url.as_str(), token, mode)?,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
