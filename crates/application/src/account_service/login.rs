use tracing::warn;

use campusconnect_core::{AppError, AppResult, Role};
use campusconnect_domain::EmailAddress;

use crate::AccountSummary;

use super::{AccountService, AuthenticatedAccount};

impl AccountService {
    /// Authenticates an account of `role` and issues an assertion.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(
        &self,
        role: Role,
        email: &str,
        password: &str,
    ) -> AppResult<AuthenticatedAccount> {
        let invalid = || AppError::Unauthenticated("invalid credentials".to_owned());

        let account = match EmailAddress::new(email) {
            Ok(email) => self.accounts.find_by_email(role, email.as_str()).await?,
            Err(_) => None,
        };

        let Some(account) = account else {
            // Hash anyway so unknown emails cost the same as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            warn!(%role, "login failed: unknown email");
            return Err(invalid());
        };

        if !self
            .password_hasher
            .verify_password(password, account.password_hash())?
        {
            warn!(%role, account = %account.id(), "login failed: wrong password");
            return Err(invalid());
        }

        self.authenticated(AccountSummary::from(&account))
    }
}
