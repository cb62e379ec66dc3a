//! Postcheck library
//!
//! Exposes the postcode normalizer, cache store, remote service client, and
//! lookup service for use in integration tests and other tooling.

pub mod api;
pub mod cache;
pub mod cli;
pub mod lookup;
pub mod postcode;
