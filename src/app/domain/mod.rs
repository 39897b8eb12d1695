//! Domain layer - core data structures and types.
//!
//! - Theme preference, resolved theme and the change payload
//! - Resolver settings

pub mod settings;
pub mod theme;

pub use settings::ResolverSettings;
pub use theme::{ResolvedTheme, ThemeChange, ThemePreference};
