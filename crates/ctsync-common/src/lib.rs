//! # ctsync-common
//!
//! Lifecycle states, the wire status vocabulary, error definitions,
//! configuration, and constants used across the ctsync workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and carries no async runtime.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
