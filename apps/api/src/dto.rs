mod accounts;
mod audit;
mod common;
mod events;

pub use accounts::{
    AccountResponse, AdminBootstrapRequest, AuthResponse, ClubResponse, ClubSignupRequest,
    LoginRequest, StudentSignupRequest, UpdateClubRequest,
};
pub use audit::{AuditLogEntryResponse, AuditLogPageResponse};
pub use common::{HealthResponse, MessageResponse};
pub use events::{
    CreateEventRequest, EventResponse, EventStatsResponse, PurchaseEventSummary, PurchaseRequest,
    PurchaseResponse, PurchasedEventResponse, RecentPurchaseResponse, UpdateEventRequest,
};
