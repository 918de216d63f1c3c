//! Command line interface for the hop-import binary

pub mod commands;
pub mod error;
