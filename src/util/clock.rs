//! Epoch-millisecond clock.
//!
//! Session timestamps are stored as epoch milliseconds, so both builds need
//! a consistent "now". The browser build reads `Date.now()`; the native
//! build (tests, tooling) reads the system clock.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

/// Current time as milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    #[cfg(feature = "hydrate")]
    {
        // Date.now() is already epoch millis as an f64.
        js_sys::Date::now() as u64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
