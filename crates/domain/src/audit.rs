use std::fmt::{Display, Formatter};
use std::str::FromStr;

use campusconnect_core::AppError;
use serde::{Deserialize, Serialize};

/// Administrative mutations recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// An admin patched an event.
    UpdateEvent,
    /// An admin deleted an event.
    DeleteEvent,
    /// An admin patched a club profile.
    UpdateClub,
    /// An admin deleted a club account.
    DeleteClub,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateEvent => "UPDATE_EVENT",
            Self::DeleteEvent => "DELETE_EVENT",
            Self::UpdateClub => "UPDATE_CLUB",
            Self::DeleteClub => "DELETE_CLUB",
        }
    }

    /// Returns the kind of record this action targets.
    #[must_use]
    pub fn target_type(&self) -> AuditTargetType {
        match self {
            Self::UpdateEvent | Self::DeleteEvent => AuditTargetType::Event,
            Self::UpdateClub | Self::DeleteClub => AuditTargetType::Club,
        }
    }
}

impl Display for AuditAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "UPDATE_EVENT" => Ok(Self::UpdateEvent),
            "DELETE_EVENT" => Ok(Self::DeleteEvent),
            "UPDATE_CLUB" => Ok(Self::UpdateClub),
            "DELETE_CLUB" => Ok(Self::DeleteClub),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Record kinds an audit entry can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditTargetType {
    /// Event record.
    Event,
    /// Club account.
    Club,
}

impl AuditTargetType {
    /// Returns a stable storage value for this target type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Club => "club",
        }
    }
}

impl Display for AuditTargetType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AuditTargetType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "event" => Ok(Self::Event),
            "club" => Ok(Self::Club),
            _ => Err(AppError::Validation(format!(
                "unknown audit target type '{value}'"
            ))),
        }
    }
}
