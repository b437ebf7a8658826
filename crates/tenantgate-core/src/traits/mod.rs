//! Seams defined in `tenantgate-core` and implemented by other crates.

pub mod clock;
pub mod stamp_store;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use stamp_store::SecurityStampStore;
