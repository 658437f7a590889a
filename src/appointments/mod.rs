// src/appointments/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::appointments_routes;
pub use store::AppointmentStore;
