//! Shared UI components.

pub mod navigation;
pub mod route_guard;
pub mod session_manager;
