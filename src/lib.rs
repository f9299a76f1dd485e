//! Clinic Settlement Core
//!
//! Umbrella crate for the invoice settlement engine. Re-exports the
//! workspace members so downstream consumers and the integration test
//! suite can depend on a single crate.

pub use core_kernel;
pub use domain_settlement;
pub use interface_api;
