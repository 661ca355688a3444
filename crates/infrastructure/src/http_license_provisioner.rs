//! GitHub Copilot license provisioning over HTTP using `reqwest`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, StatusCode};
use seatrelay_application::LicenseProvisioner;
use seatrelay_core::{AppError, AppResult, NonEmptyString};
use seatrelay_domain::LicenseAction;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// GitHub REST API version pinned for organization billing calls.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const RELAY_USER_AGENT: &str = concat!("seatrelay/", env!("CARGO_PKG_VERSION"));

/// License API contract the provisioner speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseApiMode {
    /// `POST /user/copilot-license` with a `user_id` and `action` body.
    UserSeat,
    /// `POST`/`DELETE /orgs/{organization}/copilot/billing/selected_users`.
    OrganizationSeats {
        /// Organization login that owns the Copilot subscription.
        organization: String,
    },
}

impl LicenseApiMode {
    fn endpoint_path(&self) -> String {
        match self {
            Self::UserSeat => "user/copilot-license".to_owned(),
            Self::OrganizationSeats { organization } => {
                format!("orgs/{organization}/copilot/billing/selected_users")
            }
        }
    }

    /// The per-user endpoint answers exactly 200. Seat creation on the
    /// organization endpoint answers 201 and cancellation 200.
    fn accepts(&self, status: StatusCode) -> bool {
        match self {
            Self::UserSeat => status == StatusCode::OK,
            Self::OrganizationSeats { .. } => status.is_success(),
        }
    }
}

/// License API client configuration.
#[derive(Clone)]
pub struct LicenseApiConfig {
    base_url: Url,
    token: NonEmptyString,
    mode: LicenseApiMode,
}

impl std::fmt::Debug for LicenseApiConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LicenseApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

impl LicenseApiConfig {
    /// Creates a validated license API configuration.
    pub fn new(base_url: &str, token: impl Into<String>, mode: LicenseApiMode) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid license API base URL '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "license API base URL '{base_url}' cannot carry a path"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        let token = NonEmptyString::new(token).map_err(|_| {
            AppError::Validation("license API token must not be empty".to_owned())
        })?;

        if let LicenseApiMode::OrganizationSeats { organization } = &mode {
            validate_organization(organization)?;
        }

        Ok(Self {
            base_url,
            token,
            mode,
        })
    }

    /// Returns the configured API mode.
    #[must_use]
    pub fn mode(&self) -> &LicenseApiMode {
        &self.mode
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self) -> AppResult<Url> {
        self.base_url
            .join(self.mode.endpoint_path().as_str())
            .map_err(|error| AppError::Internal(format!("invalid license API endpoint: {error}")))
    }
}

fn validate_organization(organization: &str) -> AppResult<()> {
    let is_valid = !organization.is_empty()
        && organization
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '-');

    if is_valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid GitHub organization '{organization}'"
        )))
    }
}

#[derive(Debug, Serialize)]
struct UserSeatRequest<'a> {
    user_id: &'a str,
    action: LicenseAction,
}

#[derive(Debug, Serialize)]
struct SelectedUsersRequest<'a> {
    selected_usernames: [&'a str; 1],
}

/// HTTP implementation of the license provisioning port.
#[derive(Clone)]
pub struct HttpLicenseProvisioner {
    http_client: reqwest::Client,
    config: LicenseApiConfig,
}

impl HttpLicenseProvisioner {
    /// Creates a new license provisioner over a shared HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: LicenseApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn build_request(
        &self,
        endpoint: Url,
        principal: &str,
        action: LicenseAction,
    ) -> reqwest::RequestBuilder {
        let builder = match &self.config.mode {
            LicenseApiMode::UserSeat => self.http_client.post(endpoint).json(&UserSeatRequest {
                user_id: principal,
                action,
            }),
            LicenseApiMode::OrganizationSeats { .. } => {
                let method = match action {
                    LicenseAction::Allocate => Method::POST,
                    LicenseAction::Release => Method::DELETE,
                };

                self.http_client
                    .request(method, endpoint)
                    .header(ACCEPT, GITHUB_MEDIA_TYPE)
                    .header(GITHUB_API_VERSION_HEADER, GITHUB_API_VERSION)
                    .json(&SelectedUsersRequest {
                        selected_usernames: [principal],
                    })
            }
        };

        builder
            .header(USER_AGENT, RELAY_USER_AGENT)
            .bearer_auth(self.config.token.as_str())
    }
}

#[async_trait]
impl LicenseProvisioner for HttpLicenseProvisioner {
    async fn set_license(&self, principal: &str, action: LicenseAction) -> AppResult<()> {
        let endpoint = self.config.endpoint()?;
        debug!(%endpoint, principal, %action, "sending license API request");

        let response = self
            .build_request(endpoint, principal, action)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("license API transport error: {error}")))?;

        let status = response.status();
        if self.config.mode.accepts(status) {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());

        Err(AppError::Upstream {
            status: status.as_u16(),
            message: format!("license API request for '{principal}' ({action}) failed: {body}"),
        })
    }
}
