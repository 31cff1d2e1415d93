//! CLI command implementations.

pub mod backends;
pub mod common;
pub mod launch;
pub mod lower;
pub mod trace;
pub mod version;
