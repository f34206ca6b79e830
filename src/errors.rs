// src/errors.rs

//! Crate-wide error aliases.
//!
//! Currently a thin wrapper around `anyhow`; kept as its own module so
//! structured error types have a home if they become necessary.

pub use anyhow::{Error, Result};
