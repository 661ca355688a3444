use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Directory operation type that grants a license.
pub const OPERATION_ADD_USER: &str = "Add user";

/// Directory operation type that revokes a license.
pub const OPERATION_DELETE_USER: &str = "Delete user";

/// License change requested for one principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseAction {
    /// Assigns a license seat to the principal.
    Allocate,
    /// Removes the principal's license seat.
    Release,
}

impl LicenseAction {
    /// Returns the stable wire value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Release => "release",
        }
    }

    /// Derives the action for a directory operation type.
    ///
    /// Matching is exact. Operation types outside the table carry no license
    /// semantics and yield `None`.
    #[must_use]
    pub fn from_operation_type(operation_type: &str) -> Option<Self> {
        match operation_type {
            OPERATION_ADD_USER => Some(Self::Allocate),
            OPERATION_DELETE_USER => Some(Self::Release),
            _ => None,
        }
    }
}

impl Display for LicenseAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
