//! API endpoint handlers, one module per view.

pub mod admin;
pub mod clinical;
pub mod dashboard;
pub mod health;
pub mod patients;
