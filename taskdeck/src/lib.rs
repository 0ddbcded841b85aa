//! `taskdeck` — terminal client for a remote task and label service.

pub mod cli;
pub mod config;
pub mod controller;
pub mod remote;
pub mod store;
pub mod ui;
