//! Full-occurrence registration: one form submission becomes eight linked records.

mod coerce;
mod error;
mod payload;
mod workflow;

pub use payload::FullOccurrenceRequest;
pub use workflow::register_full_occurrence;

#[cfg(test)]
pub(crate) use workflow::test_support;
