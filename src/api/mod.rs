pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod devices;
pub mod models;
