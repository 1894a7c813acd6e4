//! Core types and trait definitions for the Caredesk roster service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod account;
pub mod draft;
pub mod error;
pub mod profile;
pub mod store;

pub use error::{Error, Result};
