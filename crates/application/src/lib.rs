//! Application services and ports.

#![forbid(unsafe_code)]

mod account_ports;
mod account_service;
mod audit_log_service;
mod audit_ports;
mod event_ports;
mod event_service;
mod projections;
mod purchase_service;

#[cfg(test)]
mod test_support;

pub use account_ports::{AccountRepository, IdentityProvider, IssuedAssertion, PasswordHasher};
pub use account_service::{
    AccountService, AuthenticatedAccount, RegisterAdminInput, RegisterClubInput,
    RegisterStudentInput,
};
pub use audit_log_service::{AUDIT_LOG_PAGE_SIZE, AuditLogPage, AuditLogService};
pub use audit_ports::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
pub use event_ports::{EventRepository, PurchaseOutcome};
pub use event_service::{EventListing, EventPurchaseStats, EventService, RecentPurchase};
pub use projections::{AccountSummary, ClubSummary};
pub use purchase_service::{PurchaseReceipt, PurchaseService, PurchasedEvent};
