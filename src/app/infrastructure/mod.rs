//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Preference storage (memory, JSON file)
//! - OS color-scheme detection
//! - Error types

pub mod error;
pub mod platform;
pub mod storage;
