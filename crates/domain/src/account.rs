//! Account entities and credential validation rules.

use campusconnect_core::{AccountId, AppError, AppResult, NonEmptyString, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length (bounds Argon2id work per request).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password for a new account.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "password1",
    "password123",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "superman",
    "qwerty123",
    "welcome1",
    "letmein1",
    "starwars",
    "passw0rd",
    "admin123",
    "student1",
    "11111111",
    "00000000",
];

/// Role-specific profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountProfile {
    /// Student enrolment details.
    Student {
        /// Course of study.
        course: String,
        /// Department, when known.
        department: Option<String>,
        /// Study year, when known.
        year: Option<String>,
    },
    /// Public club details.
    Club {
        /// Free-form description.
        description: Option<String>,
        /// Logo or banner URL.
        image: Option<String>,
    },
    /// Administrators carry no extra profile.
    Admin,
}

impl AccountProfile {
    /// Returns the role implied by the profile variant.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Club { .. } => Role::Club,
            Self::Admin => Role::Admin,
        }
    }
}

/// Partial update of a club's public profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubPatch {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement image URL.
    pub image: Option<String>,
}

/// Persisted account with hashed credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    email: EmailAddress,
    name: NonEmptyString,
    password_hash: String,
    profile: AccountProfile,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Builds an account. `password_hash` must already be hashed.
    #[must_use]
    pub fn new(
        id: AccountId,
        email: EmailAddress,
        name: NonEmptyString,
        password_hash: String,
        profile: AccountProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            profile,
            created_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the stored credential hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the role-specific profile.
    #[must_use]
    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }

    /// Returns the account role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Returns when the account was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a club profile patch. Fails for non-club accounts.
    pub fn apply_club_patch(&mut self, patch: ClubPatch) -> AppResult<()> {
        let name = patch.name.map(NonEmptyString::new).transpose()?;
        let AccountProfile::Club { description, image } = &mut self.profile else {
            return Err(AppError::Validation(format!(
                "account '{}' is not a club",
                self.id
            )));
        };

        if let Some(value) = patch.description {
            *description = Some(value);
        }
        if let Some(value) = patch.image {
            *image = Some(value);
        }
        if let Some(name) = name {
            self.name = name;
        }

        Ok(())
    }
}
