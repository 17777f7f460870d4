//! PostgreSQL-backed account repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use campusconnect_application::AccountRepository;
use campusconnect_core::{AccountId, AppError, AppResult, NonEmptyString, Role};
use campusconnect_domain::{Account, AccountProfile, ClubPatch, EmailAddress};

const ACCOUNT_COLUMNS: &str = "id, role, email, name, password_hash, profile, created_at";

/// PostgreSQL implementation of the account repository port.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    role: String,
    email: String,
    name: String,
    password_hash: String,
    profile: Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let corrupt = |detail: String| {
            AppError::Internal(format!("account '{}' is corrupt: {detail}", row.id))
        };

        let role = Role::from_str(&row.role).map_err(|error| corrupt(error.to_string()))?;
        let profile: AccountProfile = serde_json::from_value(row.profile)
            .map_err(|error| corrupt(error.to_string()))?;
        if profile.role() != role {
            return Err(corrupt(format!(
                "role column '{role}' disagrees with profile '{}'",
                profile.role()
            )));
        }

        Ok(Account::new(
            AccountId::from_uuid(row.id),
            EmailAddress::new(row.email.as_str()).map_err(|error| corrupt(error.to_string()))?,
            NonEmptyString::new(row.name.as_str()).map_err(|error| corrupt(error.to_string()))?,
            row.password_hash,
            profile,
            row.created_at,
        ))
    }
}

fn encode_profile(profile: &AccountProfile) -> AppResult<Value> {
    serde_json::to_value(profile)
        .map_err(|error| AppError::Internal(format!("failed to encode account profile: {error}")))
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create_account(&self, account: Account) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, role, email, name, password_hash, profile, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.role().as_str())
        .bind(account.email().as_str())
        .bind(account.name().as_str())
        .bind(account.password_hash())
        .bind(encode_profile(account.profile())?)
        .bind(account.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!("{} already exists", account.role()));
            }
            AppError::Internal(format!("failed to create account: {error}"))
        })?;

        Ok(())
    }

    async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role = $1 AND email = $2");

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(role.as_str())
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find account by email: {error}")))?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find account '{account_id}': {error}"))
            })?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, account_ids: &[AccountId]) -> AppResult<Vec<Account>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<uuid::Uuid> = account_ids.iter().map(AccountId::as_uuid).collect();
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1)");

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to load accounts: {error}")))?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role = $1 ORDER BY name");

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list {role} accounts: {error}")))?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn update_club(
        &self,
        club_id: AccountId,
        patch: ClubPatch,
    ) -> AppResult<Option<Account>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start update transaction for club '{club_id}': {error}"
            ))
        })?;

        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 AND role = 'club' FOR UPDATE"
        );
        let Some(row) = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(club_id.as_uuid())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock club '{club_id}': {error}"))
            })?
        else {
            return Ok(None);
        };

        let mut account = Account::try_from(row)?;
        account.apply_club_patch(patch)?;

        sqlx::query(
            r#"
            UPDATE accounts
            SET name = $2, profile = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(club_id.as_uuid())
        .bind(account.name().as_str())
        .bind(encode_profile(account.profile())?)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update club '{club_id}': {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit update transaction for club '{club_id}': {error}"
            ))
        })?;

        Ok(Some(account))
    }

    async fn delete_account(&self, account_id: AccountId, role: Role) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM accounts WHERE id = $1 AND role = $2")
            .bind(account_id.as_uuid())
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete account '{account_id}': {error}"))
            })?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::migrate::Migrator;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

    async fn test_pool() -> Option<PgPool> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for postgres account tests: {error}");
        }

        Some(pool)
    }

    fn club(email: &str) -> Account {
        Account::new(
            AccountId::new(),
            EmailAddress::new(email).unwrap_or_else(|_| unreachable!()),
            NonEmptyString::new("Robotics").unwrap_or_else(|_| unreachable!()),
            "$argon2id$placeholder".to_owned(),
            AccountProfile::Club {
                description: Some("Robots".to_owned()),
                image: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn duplicate_role_email_conflicts_and_profile_round_trips() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repository = PostgresAccountRepository::new(pool);
        let email = format!("club-{}@campus.edu", uuid::Uuid::new_v4());
        let stored = club(&email);

        assert!(repository.create_account(stored.clone()).await.is_ok());
        let duplicate = repository.create_account(club(&email)).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let found = repository.find_by_email(Role::Club, &email).await;
        assert!(matches!(found, Ok(Some(ref account)) if account.id() == stored.id()
            && account.profile() == stored.profile()));
        let other_role = repository.find_by_email(Role::Student, &email).await;
        assert!(matches!(other_role, Ok(None)));
    }

    #[tokio::test]
    async fn club_patch_and_delete() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let repository = PostgresAccountRepository::new(pool);
        let stored = club(&format!("club-{}@campus.edu", uuid::Uuid::new_v4()));
        let club_id = stored.id();
        assert!(repository.create_account(stored).await.is_ok());

        let updated = repository
            .update_club(
                club_id,
                ClubPatch {
                    image: Some("https://img.campus.edu/r.png".to_owned()),
                    ..ClubPatch::default()
                },
            )
            .await;
        assert!(matches!(updated, Ok(Some(ref account)) if matches!(
            account.profile(),
            AccountProfile::Club { image: Some(_), description: Some(_) }
        )));

        let loaded = repository.find_by_ids(&[club_id]).await.unwrap_or_default();
        assert_eq!(loaded.len(), 1);

        assert!(matches!(
            repository.delete_account(club_id, Role::Admin).await,
            Ok(false)
        ));
        assert!(matches!(
            repository.delete_account(club_id, Role::Club).await,
            Ok(true)
        ));
    }
}
