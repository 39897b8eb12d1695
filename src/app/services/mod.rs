//! Services layer - reusable building blocks.
//!
//! - Typed observer list with disposer handles

pub mod observers;
