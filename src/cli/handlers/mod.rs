//! Command handler implementations for eza-history CLI
//!
//! This module organizes command handlers into logical groups:
//! - `basic`: Store operations (save, list, show, delete, clear)
//! - `browse`: Interactive history browser
//! - `config`: Configuration and status handlers

mod basic;
mod browse;
mod config;

pub use basic::*;
pub use browse::*;
pub use config::*;
