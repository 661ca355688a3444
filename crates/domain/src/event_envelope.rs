use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::null_default::null_as_default;

/// Event type Event Grid sends to confirm a new webhook subscription.
pub const SUBSCRIPTION_VALIDATION_EVENT_TYPE: &str =
    "Microsoft.EventGrid.SubscriptionValidationEvent";

/// Outer notification wrapper delivered in a webhook batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Event identifier assigned by the publisher.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Publisher-defined event type.
    #[serde(deserialize_with = "null_as_default")]
    pub event_type: String,
    /// Publisher-defined subject path.
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    /// Event time as sent by the publisher.
    #[serde(deserialize_with = "null_as_default")]
    pub event_time: String,
    /// Embedded payload, decoded separately per envelope.
    pub data: Value,
    /// Schema version of `data`.
    #[serde(deserialize_with = "null_as_default")]
    pub data_version: String,
    /// Schema version of the envelope metadata.
    #[serde(deserialize_with = "null_as_default")]
    pub metadata_version: String,
}

impl EventEnvelope {
    /// Decodes the embedded payload into `T`.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    /// Returns the parsed event time when it is a valid RFC 3339 timestamp.
    #[must_use]
    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.event_time.as_str())
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }

    /// Returns whether this envelope is a subscription validation handshake.
    #[must_use]
    pub fn is_subscription_validation(&self) -> bool {
        self.event_type == SUBSCRIPTION_VALIDATION_EVENT_TYPE
    }
}

/// Payload of a subscription validation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionValidation {
    /// Code that must be echoed back to complete the handshake.
    pub validation_code: String,
    /// Optional manual validation URL.
    #[serde(default)]
    pub validation_url: Option<String>,
}

/// Decodes a raw webhook body into its ordered envelope list.
pub fn decode_envelope_batch(body: &[u8]) -> Result<Vec<EventEnvelope>, serde_json::Error> {
    serde_json::from_slice(body)
}
