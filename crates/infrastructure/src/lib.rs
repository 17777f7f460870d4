//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_account_repository;
mod in_memory_audit_log_repository;
mod in_memory_event_repository;
mod jwt_identity_provider;
mod postgres_account_repository;
mod postgres_audit_log_repository;
mod postgres_event_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_account_repository::InMemoryAccountRepository;
pub use in_memory_audit_log_repository::InMemoryAuditLogRepository;
pub use in_memory_event_repository::InMemoryEventRepository;
pub use jwt_identity_provider::{JwtIdentityProvider, MIN_SECRET_LENGTH};
pub use postgres_account_repository::PostgresAccountRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_event_repository::PostgresEventRepository;
