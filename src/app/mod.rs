//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (preference, resolved theme, settings)
//! - `controllers/` - Orchestration (ThemeResolver, ThemeToggle)
//! - `services/` - Typed observer list
//! - `infrastructure/` - External integrations (storage, OS signal, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::resolver::ThemeResolver;
pub use controllers::toggle::{ThemeToggle, ToggleView};
pub use domain::{ResolvedTheme, ResolverSettings, ThemeChange, ThemePreference};
pub use infrastructure::error::{Result, ThemeError};
pub use infrastructure::platform::{detect_system_scheme, ColorSchemeSignal, ManualSignal, OsColorScheme};
pub use infrastructure::storage::{JsonFileStore, MemoryStore, PreferenceStore};
pub use services::observers::{Observers, Subscription};
