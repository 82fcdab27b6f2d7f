//! CLI subcommand implementations

pub mod adapt;
pub mod config;
pub mod doctor;
pub mod generate;
