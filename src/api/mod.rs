//! Remote postcode service client
//!
//! HTTP client and response types for the postcodes.io API. The lookup
//! layer consumes the validate and autocomplete operations through the
//! `PostcodeApi` trait; reverse geocoding and bulk detail lookup are
//! additional service capabilities exposed on the client directly.

mod client;

pub use client::{ApiError, BulkLookupResult, PostcodeApi, PostcodeClient, PostcodeInfo};
