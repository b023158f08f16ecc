pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod reservations;
