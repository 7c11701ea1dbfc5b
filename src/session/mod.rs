//! Session core: durable storage, the Local Session Store, and the
//! lifecycle controller that keeps the local session reconciled against the
//! identity provider.
//!
//! DESIGN
//! ======
//! Storage is split from semantics so the store and controller are fully
//! testable on native builds: `storage` provides the key/value backends
//! (browser localStorage vs. in-memory), `store` layers the session
//! invariants on top, and `controller` orchestrates the provider and the
//! backend exchange.

pub mod controller;
pub mod storage;
pub mod store;
