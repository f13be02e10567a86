//! Adapters - concrete implementations of ports and collaborators

pub mod clock;
pub mod memory;

pub use clock::{FixedClock, SystemClock};
pub use memory::{lock_client, MemoryRegistry, SharedClient};
