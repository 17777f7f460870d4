use async_trait::async_trait;
use chrono::{DateTime, Utc};

use campusconnect_core::{AccountId, AppResult, Identity, Role};
use campusconnect_domain::{Account, ClubPatch};

/// Repository port for student, club and admin accounts.
///
/// Emails are unique within one role.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persists a new account. Fails with `Conflict` when the email is
    /// already registered for the same role.
    async fn create_account(&self, account: Account) -> AppResult<()>;

    /// Finds an account by role and normalized email.
    async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<Account>>;

    /// Finds an account by identifier.
    async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<Account>>;

    /// Returns every account whose identifier is listed. Unknown ids are
    /// skipped.
    async fn find_by_ids(&self, account_ids: &[AccountId]) -> AppResult<Vec<Account>>;

    /// Lists accounts of one role ordered by name.
    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>>;

    /// Applies a club profile patch. Returns `None` when no club has the id.
    async fn update_club(&self, club_id: AccountId, patch: ClubPatch)
    -> AppResult<Option<Account>>;

    /// Deletes an account of the given role. Returns whether a record was
    /// removed.
    async fn delete_account(&self, account_id: AccountId, role: Role) -> AppResult<bool>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Signed assertion handed to a client after signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAssertion {
    /// Opaque bearer token.
    pub token: String,
    /// Instant after which `verify` rejects the token.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies time-boxed identity assertions.
pub trait IdentityProvider: Send + Sync {
    /// Signs an assertion for `subject` carrying `role`.
    fn issue(&self, subject: AccountId, role: Role) -> AppResult<IssuedAssertion>;

    /// Verifies signature and expiry. Fails with `Unauthenticated` for any
    /// invalid assertion.
    fn verify(&self, assertion: &str) -> AppResult<Identity>;
}
