use async_trait::async_trait;
use seatrelay_core::AppResult;
use seatrelay_domain::LicenseAction;

/// Port for the external license provisioning API.
#[async_trait]
pub trait LicenseProvisioner: Send + Sync {
    /// Applies one license action to one principal.
    ///
    /// Implementations return [`seatrelay_core::AppError::Upstream`] when the
    /// remote service answers outside its success contract.
    async fn set_license(&self, principal: &str, action: LicenseAction) -> AppResult<()>;
}
