//! CLI command implementations

pub mod check;
pub mod info;
pub mod tokens;
