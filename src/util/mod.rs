//! Shared utilities

pub mod cancel;
pub mod resource;
pub mod time;
