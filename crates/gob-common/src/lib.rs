//! Common utilities for the gob engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - colored terminal output for skipped or unsupported input

pub mod warning;
