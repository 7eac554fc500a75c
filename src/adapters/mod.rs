//! Adapters layer: Concrete implementations of ports.
//!
//! - `memory`: in-process JSON document store for patient records
//! - `clock`: host and fixed clocks
//! - `sanitize`: patient-identifier filtering for logs

pub mod clock;
pub mod memory;
pub mod sanitize;

pub use clock::{FixedClock, SystemClock};
pub use memory::{InMemoryRepository, RepositoryError};
