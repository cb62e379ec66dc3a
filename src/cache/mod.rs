//! Cache module for storing postcode lookup results on disk
//!
//! This module persists a single JSON document mapping normalized postcode
//! keys to the facts already fetched for them (validity, completions). The
//! document is consulted before every remote call and updated after every
//! successful one, so the remote service is only queried once per fact.

mod store;

pub use store::{CacheDocument, CacheError, CacheRecord, CacheStore};
