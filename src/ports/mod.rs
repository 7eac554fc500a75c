//! Ports layer: Trait definitions for the engine's collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the rules engine and the outside world (clock, patient store).

mod clock;
mod repository;

pub use clock::Clock;
pub use repository::PatientRepository;
