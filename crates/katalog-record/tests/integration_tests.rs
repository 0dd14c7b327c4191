//! Integration test suite for Katalog catalog flows.
//!
//! Runs the list and detail flows end to end over the in-memory index, a
//! scripted holdings service and the brand middleware.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
mod integration;
