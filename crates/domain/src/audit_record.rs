use seatrelay_core::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::null_default::null_as_default;

/// Target resource type tag that identifies a directory user.
pub const TARGET_TYPE_USER: &str = "User";

/// Directory audit-log record embedded in an event envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditRecord {
    /// Audit category, for example `UserManagement`.
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    /// Actor that initiated the directory operation.
    #[serde(deserialize_with = "null_as_default")]
    pub initiated_by: Initiator,
    /// Directory operation name, for example `Add user`.
    #[serde(deserialize_with = "null_as_default")]
    pub operation_type: String,
    /// Operation outcome reported by the directory.
    #[serde(deserialize_with = "null_as_default")]
    pub result: String,
    /// Resources affected by the operation, in directory order.
    #[serde(deserialize_with = "null_as_default")]
    pub target_resources: Vec<TargetResource>,
}

/// Initiator of a directory operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Initiator {
    /// User initiator, when the operation was performed by a person.
    #[serde(deserialize_with = "null_as_default")]
    pub user: InitiatorUser,
}

/// User initiator details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitiatorUser {
    /// Principal name of the initiating user.
    #[serde(deserialize_with = "null_as_default")]
    pub user_principal_name: String,
}

/// One resource affected by a directory operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetResource {
    /// Directory object identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Resource type tag.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub resource_type: String,
    /// Principal name, populated for user targets.
    #[serde(deserialize_with = "null_as_default")]
    pub user_principal_name: String,
}

impl TargetResource {
    /// Returns whether this target is a directory user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.resource_type == TARGET_TYPE_USER
    }

    /// Returns the principal name when it is present and not blank.
    #[must_use]
    pub fn principal_name(&self) -> Option<NonEmptyString> {
        NonEmptyString::new(self.user_principal_name.as_str()).ok()
    }
}
