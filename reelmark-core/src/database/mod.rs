//! Storage ports and their adapters.
//!
//! Application services only see the traits in [`ports`]. The Postgres
//! adapters are the production backend; the in-memory adapters back tests and
//! database-less development runs.

pub mod memory;
pub mod ports;

#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod postgres;
