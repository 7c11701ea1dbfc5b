//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Reactive state is kept as plain cloneable structs held in `RwSignal`
//! contexts, so components stay independent of where the data comes from.

pub mod auth;
