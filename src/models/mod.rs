//! Data models for the openaid backend.
//!
//! Remote API records, the per-request facet selection and the local
//! country border reference records.

mod activity;
mod border;
mod facets;

pub use activity::*;
pub use border::*;
pub use facets::*;
