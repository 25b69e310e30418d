//! Elasticsearch client plumbing for the Kibana tooling
//!
//! The transport is a pluggable send function operating on an [`EsRequest`]
//! payload in place. The [`fake`] module provides an ordered, scripted
//! transport for driving [`EsClient`] in tests.

#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod fake;
pub mod request;

pub use client::{EsClient, SendRequestFn};
pub use error::EsError;
pub use request::EsRequest;
