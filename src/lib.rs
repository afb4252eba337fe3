//! Recovery Mode library crate
//!
//! On-device coping tools for brain fog: a blackout screen, a fifteen minute
//! rest timer, fuel and pacing reminders, a rotating set of animal facts, and
//! a local notes pad with optional dictation. Nothing leaves the device.

pub mod capabilities;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod models;
pub mod notes;
pub mod shell;
pub mod store;
pub mod timer;

pub use models::{AppState, Core, Snapshot, View};
