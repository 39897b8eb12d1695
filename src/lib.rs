//! Theme resolution for the RoomLedger dashboard.
//!
//! Maps the admin's stored theme preference (`light`, `dark` or `system`)
//! and the operating system's color-scheme signal to the theme actually
//! applied, persists the preference, and notifies UI code on every change.
//!
//! ```rust
//! use roomledger_theme::{
//!     ManualSignal, MemoryStore, ResolvedTheme, ResolverSettings, RootClasses, ThemePreference,
//!     ThemeResolver,
//! };
//!
//! let signal = ManualSignal::new(true);
//! let root = RootClasses::new();
//! let resolver = ThemeResolver::new(
//!     MemoryStore::new(),
//!     signal.clone(),
//!     root.clone(),
//!     ResolverSettings::default(),
//! );
//! resolver.initialize();
//! assert_eq!(resolver.get_theme(), ThemePreference::System);
//! assert_eq!(resolver.get_resolved_theme(), ResolvedTheme::Dark);
//!
//! resolver.set_theme(ThemePreference::Light);
//! signal.set_prefers_dark(false);
//! assert!(root.has_class("light"));
//! ```

pub mod app;
pub mod ui;

pub use app::*;
pub use ui::theme::{RootClasses, ThemeSurface, TRANSITION_CLASS};
