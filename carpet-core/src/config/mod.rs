//! Configuration types and the `carpet.toml` parser

pub mod parser;
pub mod types;

pub use parser::parse_config;
pub use types::*;
