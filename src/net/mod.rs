//! Backend API surface: request/response types and the exchange client.

pub mod api;
pub mod types;
