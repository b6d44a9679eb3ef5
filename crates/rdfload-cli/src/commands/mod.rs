//! Command implementations

pub mod import;
