//! Account registration, login and club moderation.
//!
//! Every failed login answers with the same generic message so callers cannot
//! probe which emails are registered.

use std::sync::Arc;

use campusconnect_core::AppResult;
use sha2::{Digest, Sha256};

use crate::{
    AccountRepository, AccountSummary, AuditLogService, IdentityProvider, IssuedAssertion,
    PasswordHasher,
};

mod clubs;
mod login;
mod registration;

/// Input for student signup.
#[derive(Debug, Clone)]
pub struct RegisterStudentInput {
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Course of study.
    pub course: String,
}

/// Input for club signup.
#[derive(Debug, Clone)]
pub struct RegisterClubInput {
    /// Club name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional public description.
    pub description: Option<String>,
}

/// Input for admin account creation.
#[derive(Debug, Clone)]
pub struct RegisterAdminInput {
    /// Admin name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Account plus a freshly issued assertion.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    /// Public account data.
    pub account: AccountSummary,
    /// Bearer assertion for subsequent calls.
    pub assertion: IssuedAssertion,
}

/// Application service for account lifecycle operations.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    identity_provider: Arc<dyn IdentityProvider>,
    audit_log: AuditLogService,
    bootstrap_token_digest: [u8; 32],
}

impl AccountService {
    /// Creates a new account service. `bootstrap_token` gates admin creation.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        identity_provider: Arc<dyn IdentityProvider>,
        audit_log: AuditLogService,
        bootstrap_token: &str,
    ) -> Self {
        Self {
            accounts,
            password_hasher,
            identity_provider,
            audit_log,
            bootstrap_token_digest: digest(bootstrap_token),
        }
    }

    /// Returns the identity provider for request authentication.
    #[must_use]
    pub fn identity_provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity_provider
    }

    fn authenticated(&self, account: AccountSummary) -> AppResult<AuthenticatedAccount> {
        let assertion = self.identity_provider.issue(account.id, account.role)?;
        Ok(AuthenticatedAccount { account, assertion })
    }

    fn bootstrap_token_matches(&self, presented: &str) -> bool {
        let presented = digest(presented);
        presented
            .iter()
            .zip(self.bootstrap_token_digest.iter())
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
