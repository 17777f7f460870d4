//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod audit;
mod event;

pub use account::{
    Account, AccountProfile, ClubPatch, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
    validate_password,
};
pub use audit::{AuditAction, AuditTargetType};
pub use event::{
    Event, EventId, EventParts, EventPatch, NewEvent, Purchase, PurchaseId, TicketPrice,
    parse_event_date,
};
