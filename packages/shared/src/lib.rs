//! Utilities shared by the Mitsumori server and client binaries.

pub mod logger;
pub mod time;
