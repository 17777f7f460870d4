use campusconnect_application::{AccountService, AuditLogService, EventService, PurchaseService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub purchase_service: PurchaseService,
    pub event_service: EventService,
    pub audit_log_service: AuditLogService,
    pub account_service: AccountService,
}
