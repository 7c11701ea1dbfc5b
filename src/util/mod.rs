//! Small shared helpers with no domain logic of their own.

pub mod clock;
