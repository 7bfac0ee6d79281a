//! Command-line interface: argument definitions and configuration loading

pub mod args;
pub mod config;
