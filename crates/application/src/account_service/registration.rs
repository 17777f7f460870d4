use chrono::Utc;
use tracing::{info, warn};

use campusconnect_core::{AccountId, AppError, AppResult, NonEmptyString};
use campusconnect_domain::{Account, AccountProfile, EmailAddress, validate_password};

use crate::AccountSummary;

use super::{
    AccountService, AuthenticatedAccount, RegisterAdminInput, RegisterClubInput,
    RegisterStudentInput,
};

impl AccountService {
    /// Registers a student and issues an assertion.
    pub async fn register_student(
        &self,
        input: RegisterStudentInput,
    ) -> AppResult<AuthenticatedAccount> {
        let course = NonEmptyString::new(input.course)?;
        self.register(
            &input.name,
            &input.email,
            &input.password,
            AccountProfile::Student {
                course: course.into(),
                department: None,
                year: None,
            },
        )
        .await
    }

    /// Registers a club and issues an assertion.
    pub async fn register_club(&self, input: RegisterClubInput) -> AppResult<AuthenticatedAccount> {
        self.register(
            &input.name,
            &input.email,
            &input.password,
            AccountProfile::Club {
                description: input.description.filter(|value| !value.trim().is_empty()),
                image: None,
            },
        )
        .await
    }

    /// Creates an admin account when `bootstrap_token` matches the configured
    /// secret.
    pub async fn bootstrap_admin(
        &self,
        bootstrap_token: &str,
        input: RegisterAdminInput,
    ) -> AppResult<AuthenticatedAccount> {
        if !self.bootstrap_token_matches(bootstrap_token) {
            warn!("admin bootstrap rejected: invalid bootstrap token");
            return Err(AppError::Unauthenticated(
                "invalid bootstrap token".to_owned(),
            ));
        }

        self.register(
            &input.name,
            &input.email,
            &input.password,
            AccountProfile::Admin,
        )
        .await
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        profile: AccountProfile,
    ) -> AppResult<AuthenticatedAccount> {
        let role = profile.role();
        let name = NonEmptyString::new(name)?;
        let email = EmailAddress::new(email)?;
        validate_password(password)?;

        if self
            .accounts
            .find_by_email(role, email.as_str())
            .await?
            .is_some()
        {
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Conflict(format!("{role} already exists")));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let account = Account::new(
            AccountId::new(),
            email,
            name,
            password_hash,
            profile,
            Utc::now(),
        );
        let summary = AccountSummary::from(&account);
        self.accounts.create_account(account).await?;

        info!(account = %summary.id, role = %role, "account registered");

        self.authenticated(summary)
    }
}
