//! Clock port: source of "today" for day counts and date stamps.

use chrono::NaiveDate;

/// Resolves the current calendar date.
///
/// Inject a fixed implementation wherever results must be reproducible.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
