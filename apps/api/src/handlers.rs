pub mod accounts;
pub mod audit;
pub mod clubs;
pub mod events;
pub mod health;
pub mod purchases;
