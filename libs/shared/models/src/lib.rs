pub mod appointment;
pub mod auth;
pub mod availability;
pub mod error;
pub mod user;
