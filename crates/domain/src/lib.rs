//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit_record;
mod event_envelope;
mod license;
mod null_default;

pub use audit_record::{AuditRecord, Initiator, InitiatorUser, TARGET_TYPE_USER, TargetResource};
pub use event_envelope::{
    EventEnvelope, SUBSCRIPTION_VALIDATION_EVENT_TYPE, SubscriptionValidation,
    decode_envelope_batch,
};
pub use license::{LicenseAction, OPERATION_ADD_USER, OPERATION_DELETE_USER};
