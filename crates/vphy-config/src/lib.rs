//! Configuration management for the GSM virtual PHY
//!
//! This crate provides configuration loading and parsing:
//! - TOML configuration file parsing
//! - Virtual-PHY configuration structures

pub mod stack_config;
pub mod toml_config;

pub use stack_config::*;
pub use toml_config::*;
