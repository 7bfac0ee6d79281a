//! Test modules for broker description and resolution
