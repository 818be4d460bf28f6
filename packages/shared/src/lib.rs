//! Utilities shared by the Hiroba packages: logging setup and time handling.

pub mod logger;
pub mod time;
