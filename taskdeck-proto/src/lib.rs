//! Shared data model for the `taskdeck` client.
//!
//! These types mirror the JSON documents exchanged with the remote task
//! service. Everything here is pure: no I/O, no clocks.

pub mod filter;
pub mod label;
pub mod task;
