//! Reelforge - Reel shot list converter
//!
//! This library crate exposes configuration and file conversion for the
//! binary and for integration testing.

pub mod config;
pub mod convert;
