//! profile-recovery: recover open tabs, bookmarks and history from a Chrome profile.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod snapshot;
pub mod types;
