pub mod auth;
pub mod error;
pub mod meals;
pub mod middleware;
pub mod reservations;
mod views;
