//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, infrastructure, and the UI:
//! - Theme resolution
//! - Theme toggle binding

pub mod resolver;
pub mod toggle;
