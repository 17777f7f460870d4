use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AccountId, AppError, AppResult};

/// Account role carried in every identity assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Student buying tickets.
    Student,
    /// Club publishing events.
    Club,
    /// Administrator moderating records.
    Admin,
}

impl Role {
    /// Returns the stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Club => "club",
            Self::Admin => "admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "club" => Ok(Self::Club),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Verified caller identity decoded from a signed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    subject: AccountId,
    role: Role,
}

impl Identity {
    /// Creates an identity from a verified subject and role.
    #[must_use]
    pub fn new(subject: AccountId, role: Role) -> Self {
        Self { subject, role }
    }

    /// Returns the account the assertion was issued to.
    #[must_use]
    pub fn subject(&self) -> AccountId {
        self.subject
    }

    /// Returns the role claim.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Fails with `Forbidden` unless the identity carries `required`.
    pub fn require_role(&self, required: Role) -> AppResult<()> {
        if self.role == required {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "{required} access required, caller has role '{}'",
            self.role
        )))
    }
}
