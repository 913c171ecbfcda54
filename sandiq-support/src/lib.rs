//! # Sandiq Support
//!
//! Shared utilities for the Sandiq IoC container.
//!
//! This crate provides:
//! - Type-name shortening for error messages
//! - "Did you mean?" suggestions for unresolved identifiers

pub mod rendering;
