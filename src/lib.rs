//! # Nutriguard
//!
//! Clinical nutrition rules engine for ICU, NICU and PICU feeding management.
//!
//! This crate provides:
//! - Energy, macronutrient and micronutrient targets for adult and pediatric patients
//! - Daily bedside assessment scoring with a feeding-adjustment recommendation
//! - Next-day plan adjustment, capped at requirement bounds
//! - GI tolerance scoring and trend detection
//! - Enteral advancement protocols and the weaning-phase state machine
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core clinical types and pure rules
//! - `ports`: Trait definitions for collaborators (clock, patient store)
//! - `adapters`: Concrete implementations (in-memory store, clocks, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Tunable clinical policy
//! - `logging`: Subscriber bootstrap with identifier redaction

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;

pub use config::PolicyConfig;
pub use domain::{
    AdjustedPlan, AssessmentScoreResult, DailyAssessment, FeedingAdjustment, NutritionRequirements,
    Patient, RiskLevel, WeaningPhase, WeaningPlan,
};

/// Result type for Nutriguard operations
pub type Result<T> = std::result::Result<T, NutriguardError>;

/// Main error type for Nutriguard
#[derive(Debug, thiserror::Error)]
pub enum NutriguardError {
    #[error("Unsupported weaning phase: {0}")]
    UnsupportedPhase(domain::WeaningPhase),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::RepositoryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
