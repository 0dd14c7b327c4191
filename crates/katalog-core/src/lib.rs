//! Katalog Core: shared errors and record types.
//!
//! This crate provides the foundational types used across all Katalog crates.
//! It has no internal Katalog dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`record`]: Read-only view over indexed documents

#![doc = include_str!("../README.md")]

pub mod error;
pub mod record;

// Re-export key types at crate root for convenience
pub use error::{Error, ErrorKind, Result};
pub use record::RawRecord;
