use std::env;
use std::path::PathBuf;

use roomledger_theme::{
    JsonFileStore, OsColorScheme, ResolverSettings, RootClasses, ThemeResolver, ThemeToggle,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let settings = ResolverSettings::load();
    let store_path: PathBuf = settings
        .preferences_file
        .clone()
        .unwrap_or_else(JsonFileStore::default_path);

    let root = RootClasses::new();
    let resolver = ThemeResolver::new(
        JsonFileStore::new(store_path),
        OsColorScheme::new(),
        root.clone(),
        settings,
    );
    resolver.initialize();

    let toggle = ThemeToggle::bind(&resolver, |view| {
        tracing::info!(icon = view.icon, label = %view.label, "Theme toggle redrawn");
    });

    match env::args().nth(1).as_deref() {
        Some("toggle") => toggle.click(),
        Some(candidate) => resolver.set_theme_str(candidate),
        None => {}
    }

    let current = resolver.current();
    println!("{} -> {}", current.preference, current.resolved_theme);
    println!("root classes: {}", root.classes().join(" "));

    toggle.unbind();
    resolver.destroy();
}
