use std::sync::Arc;

use campusconnect_application::{
    AccountRepository, AccountService, AuditLogRepository, AuditLogService, EventRepository,
    EventService, PurchaseService,
};
use campusconnect_core::AppError;
use campusconnect_infrastructure::{
    Argon2PasswordHasher, InMemoryAccountRepository, InMemoryAuditLogRepository,
    InMemoryEventRepository, JwtIdentityProvider, PostgresAccountRepository,
    PostgresAuditLogRepository, PostgresEventRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

struct RepositorySet {
    events: Arc<dyn EventRepository>,
    accounts: Arc<dyn AccountRepository>,
    audit_log: Arc<dyn AuditLogRepository>,
}

pub fn build_postgres_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    build_app_state(
        RepositorySet {
            events: Arc::new(PostgresEventRepository::new(pool.clone())),
            accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
            audit_log: Arc::new(PostgresAuditLogRepository::new(pool)),
        },
        config,
    )
}

pub fn build_in_memory_state(config: &ApiConfig) -> Result<AppState, AppError> {
    build_app_state(
        RepositorySet {
            events: Arc::new(InMemoryEventRepository::new()),
            accounts: Arc::new(InMemoryAccountRepository::new()),
            audit_log: Arc::new(InMemoryAuditLogRepository::new()),
        },
        config,
    )
}

fn build_app_state(repositories: RepositorySet, config: &ApiConfig) -> Result<AppState, AppError> {
    let identity_provider = Arc::new(JwtIdentityProvider::new(
        &config.jwt_secret,
        config.token_ttl_seconds,
    )?);
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let audit_log_service = AuditLogService::new(repositories.audit_log);

    Ok(AppState {
        purchase_service: PurchaseService::new(
            repositories.events.clone(),
            repositories.accounts.clone(),
        ),
        event_service: EventService::new(
            repositories.events,
            repositories.accounts.clone(),
            audit_log_service.clone(),
        ),
        account_service: AccountService::new(
            repositories.accounts,
            password_hasher,
            identity_provider,
            audit_log_service.clone(),
            &config.admin_bootstrap_token,
        ),
        audit_log_service,
    })
}
