//! tgs-conf library
//!
//! Fills configuration structs from tag defaults, environment variables,
//! command-line flags or secret-store providers, and generates the matching
//! usage text.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
