//! `stockbook-core` — domain building blocks shared by the inventory crates.
//!
//! Pure domain primitives only (no IO).

pub mod aggregate;
pub mod error;

pub use aggregate::Aggregate;
pub use error::{DomainError, DomainResult};
