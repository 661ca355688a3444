use std::sync::Arc;

use seatrelay_core::{AppError, AppResult};
use seatrelay_domain::{
    AuditRecord, EventEnvelope, LicenseAction, SubscriptionValidation, decode_envelope_batch,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::license_ports::LicenseProvisioner;

/// Summary of one relayed webhook batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Envelopes decoded from the request body.
    pub envelopes_received: usize,
    /// Envelopes whose payload could not be decoded.
    pub skipped_envelopes: usize,
    /// Audit records whose operation type carries no license action.
    pub unmapped_records: usize,
    /// Targets skipped because they are not users or lack a principal name.
    pub ignored_targets: usize,
    /// Successful allocate calls.
    pub licenses_allocated: usize,
    /// Successful release calls.
    pub licenses_released: usize,
    /// Code to echo back when the batch carried a subscription validation event.
    pub validation_code: Option<String>,
}

impl RelayOutcome {
    fn record_applied(&mut self, action: LicenseAction) {
        match action {
            LicenseAction::Allocate => self.licenses_allocated += 1,
            LicenseAction::Release => self.licenses_released += 1,
        }
    }
}

/// Relays directory lifecycle webhooks to the license provisioning API.
#[derive(Clone)]
pub struct RelayService {
    provisioner: Arc<dyn LicenseProvisioner>,
}

impl RelayService {
    /// Creates a relay service.
    #[must_use]
    pub fn new(provisioner: Arc<dyn LicenseProvisioner>) -> Self {
        Self { provisioner }
    }

    /// Relays one raw webhook body.
    ///
    /// A body that is not a JSON array of envelopes fails with
    /// [`AppError::Validation`] before any outbound call. Undecodable envelopes
    /// and unmapped operation types are skipped. The first provisioning failure
    /// aborts the remaining batch.
    pub async fn relay_batch(&self, body: &[u8]) -> AppResult<RelayOutcome> {
        let batch_id = Uuid::new_v4();
        let envelopes = decode_envelope_batch(body).map_err(|error| {
            AppError::Validation(format!("error parsing request body: {error}"))
        })?;

        let mut outcome = RelayOutcome {
            envelopes_received: envelopes.len(),
            ..RelayOutcome::default()
        };

        for envelope in &envelopes {
            if envelope.is_subscription_validation() {
                accept_subscription_validation(batch_id, envelope, &mut outcome);
                continue;
            }

            let record = match envelope.decode_data::<AuditRecord>() {
                Ok(record) => record,
                Err(error) => {
                    warn!(
                        %batch_id,
                        event_id = %envelope.id,
                        event_time = ?envelope.event_time(),
                        error = %error,
                        "error parsing event data, skipping envelope"
                    );
                    outcome.skipped_envelopes += 1;
                    continue;
                }
            };

            let Some(action) = LicenseAction::from_operation_type(&record.operation_type) else {
                info!(
                    %batch_id,
                    event_id = %envelope.id,
                    event_time = ?envelope.event_time(),
                    operation_type = %record.operation_type,
                    "unhandled operation type"
                );
                outcome.unmapped_records += 1;
                continue;
            };

            self.apply_record(batch_id, envelope, &record, action, &mut outcome)
                .await?;
        }

        info!(
            %batch_id,
            envelopes = outcome.envelopes_received,
            skipped = outcome.skipped_envelopes,
            unmapped = outcome.unmapped_records,
            allocated = outcome.licenses_allocated,
            released = outcome.licenses_released,
            "relayed webhook batch"
        );

        Ok(outcome)
    }

    async fn apply_record(
        &self,
        batch_id: Uuid,
        envelope: &EventEnvelope,
        record: &AuditRecord,
        action: LicenseAction,
        outcome: &mut RelayOutcome,
    ) -> AppResult<()> {
        for target in &record.target_resources {
            if !target.is_user() {
                debug!(
                    %batch_id,
                    event_id = %envelope.id,
                    target_type = %target.resource_type,
                    "ignoring non-user target"
                );
                outcome.ignored_targets += 1;
                continue;
            }

            let Some(principal) = target.principal_name() else {
                warn!(
                    %batch_id,
                    event_id = %envelope.id,
                    target_id = %target.id,
                    "user target has no principal name"
                );
                outcome.ignored_targets += 1;
                continue;
            };

            if let Err(provisioning_error) = self
                .provisioner
                .set_license(principal.as_str(), action)
                .await
            {
                error!(
                    %batch_id,
                    event_id = %envelope.id,
                    principal = %principal.as_str(),
                    %action,
                    error = %provisioning_error,
                    "license provisioning failed, aborting batch"
                );
                return Err(escalate_provisioning_error(
                    principal.as_str(),
                    provisioning_error,
                ));
            }

            info!(
                %batch_id,
                event_id = %envelope.id,
                event_time = ?envelope.event_time(),
                principal = %principal.as_str(),
                %action,
                "license updated"
            );
            outcome.record_applied(action);
        }

        Ok(())
    }
}

fn accept_subscription_validation(
    batch_id: Uuid,
    envelope: &EventEnvelope,
    outcome: &mut RelayOutcome,
) {
    match envelope.decode_data::<SubscriptionValidation>() {
        Ok(validation) => {
            info!(%batch_id, event_id = %envelope.id, "subscription validation requested");
            if outcome.validation_code.is_none() {
                outcome.validation_code = Some(validation.validation_code);
            }
        }
        Err(error) => {
            warn!(
                %batch_id,
                event_id = %envelope.id,
                error = %error,
                "error parsing subscription validation data, skipping envelope"
            );
            outcome.skipped_envelopes += 1;
        }
    }
}

/// Provisioning failures always surface as server errors, never as caller input errors.
fn escalate_provisioning_error(principal: &str, error: AppError) -> AppError {
    match error {
        AppError::Validation(message) => AppError::Internal(format!(
            "license provisioning for '{principal}' failed: {message}"
        )),
        other => other,
    }
}
