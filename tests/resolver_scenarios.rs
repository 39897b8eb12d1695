use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use roomledger_theme::{
    JsonFileStore, ManualSignal, MemoryStore, PreferenceStore, ResolvedTheme, ResolverSettings,
    RootClasses, ThemeChange, ThemePreference, ThemeResolver,
};

fn settings() -> ResolverSettings {
    ResolverSettings {
        transition_ms: 0,
        ..Default::default()
    }
}

fn resolver_on<S: PreferenceStore + 'static>(store: S, signal: &ManualSignal) -> ThemeResolver {
    let resolver = ThemeResolver::new(store, signal.clone(), RootClasses::new(), settings());
    resolver.initialize();
    resolver
}

#[test]
fn test_fresh_start_with_dark_os() {
    let signal = ManualSignal::new(true);
    let resolver = resolver_on(MemoryStore::new(), &signal);
    assert_eq!(resolver.get_theme(), ThemePreference::System);
    assert_eq!(resolver.get_resolved_theme(), ResolvedTheme::Dark);
}

#[test]
fn test_invalid_value_on_light_resolver() {
    let signal = ManualSignal::new(false);
    let resolver = resolver_on(MemoryStore::new(), &signal);
    resolver.set_theme(ThemePreference::Light);

    let fired = Rc::new(RefCell::new(0));
    let fired_clone = Rc::clone(&fired);
    let _sub = resolver.subscribe(move |_| *fired_clone.borrow_mut() += 1);

    resolver.set_theme_str("purple");
    assert_eq!(resolver.get_theme(), ThemePreference::Light);
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn test_two_subscribers_notified_in_order() {
    let signal = ManualSignal::new(false);
    let resolver = resolver_on(MemoryStore::new(), &signal);
    let log: Rc<RefCell<Vec<(&str, ThemeChange)>>> = Rc::new(RefCell::new(Vec::new()));

    let log_a = Rc::clone(&log);
    let _a = resolver.subscribe(move |change| log_a.borrow_mut().push(("A", *change)));
    let log_b = Rc::clone(&log);
    let _b = resolver.subscribe(move |change| log_b.borrow_mut().push(("B", *change)));

    resolver.set_theme(ThemePreference::Dark);

    let expected = ThemeChange {
        preference: ThemePreference::Dark,
        resolved_theme: ResolvedTheme::Dark,
    };
    assert_eq!(*log.borrow(), vec![("A", expected), ("B", expected)]);
}

#[test]
fn test_failing_subscriber_does_not_block_others() {
    let signal = ManualSignal::new(false);
    let resolver = resolver_on(MemoryStore::new(), &signal);

    let _a = resolver.subscribe(|_| panic!("A exploded"));
    let seen = Rc::new(RefCell::new(None));
    let seen_clone = Rc::clone(&seen);
    let _b = resolver.subscribe(move |change| *seen_clone.borrow_mut() = Some(*change));

    resolver.set_theme(ThemePreference::Dark);
    assert_eq!(seen.borrow().map(|c| c.resolved_theme), Some(ResolvedTheme::Dark));
    assert_eq!(resolver.get_theme(), ThemePreference::Dark);
}

#[test]
fn test_memory_persistence_across_reload() {
    let store = MemoryStore::new();
    let signal = ManualSignal::new(false);
    let first = resolver_on(store.clone(), &signal);
    first.set_theme(ThemePreference::Dark);
    first.destroy();

    let reloaded = resolver_on(store, &signal);
    assert_eq!(reloaded.get_theme(), ThemePreference::Dark);
    assert_eq!(reloaded.get_resolved_theme(), ResolvedTheme::Dark);
}

#[test]
fn test_file_persistence_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roomledger").join("preferences.json");
    let signal = ManualSignal::new(true);

    let first = resolver_on(JsonFileStore::new(&path), &signal);
    first.set_theme(ThemePreference::Light);
    first.destroy();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\"theme\": \"light\""));

    let reloaded = resolver_on(JsonFileStore::new(&path), &signal);
    assert_eq!(reloaded.get_theme(), ThemePreference::Light);
    assert!(reloaded.is_light());
}

#[test]
fn test_corrupt_preferences_file_falls_back_to_system() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    fs::write(&path, "{{{").unwrap();
    let signal = ManualSignal::new(true);

    let resolver = resolver_on(JsonFileStore::new(&path), &signal);
    assert_eq!(resolver.get_theme(), ThemePreference::System);
    assert_eq!(resolver.get_resolved_theme(), ResolvedTheme::Dark);

    resolver.set_theme(ThemePreference::Dark);
    let reloaded = resolver_on(JsonFileStore::new(&path), &signal);
    assert_eq!(reloaded.get_theme(), ThemePreference::Dark);
}

#[test]
fn test_unwritable_store_keeps_session_theme() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be makes every write fail.
    let path = dir.path().join("preferences.json");
    fs::create_dir(&path).unwrap();
    let signal = ManualSignal::new(false);

    let resolver = resolver_on(JsonFileStore::new(&path), &signal);
    resolver.set_theme(ThemePreference::Dark);
    assert_eq!(resolver.get_theme(), ThemePreference::Dark);
    assert!(resolver.is_dark());
}

#[test]
fn test_os_flip_after_explicit_light_is_silent() {
    let signal = ManualSignal::new(false);
    let resolver = resolver_on(MemoryStore::new(), &signal);
    resolver.set_theme(ThemePreference::Light);

    let fired = Rc::new(RefCell::new(0));
    let fired_clone = Rc::clone(&fired);
    let _sub = resolver.subscribe(move |_| *fired_clone.borrow_mut() += 1);

    signal.set_prefers_dark(true);
    assert_eq!(resolver.get_resolved_theme(), ResolvedTheme::Light);
    assert_eq!(*fired.borrow(), 0);

    // Switching back to system picks up the flip that happened meanwhile.
    resolver.set_theme(ThemePreference::System);
    assert_eq!(resolver.get_resolved_theme(), ResolvedTheme::Dark);
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn test_double_initialize_single_round_per_os_change() {
    let signal = ManualSignal::new(false);
    let resolver = resolver_on(MemoryStore::new(), &signal);
    resolver.initialize();

    let fired = Rc::new(RefCell::new(0));
    let fired_clone = Rc::clone(&fired);
    let _sub = resolver.subscribe(move |_| *fired_clone.borrow_mut() += 1);

    signal.set_prefers_dark(true);
    assert_eq!(*fired.borrow(), 1);
    assert_eq!(signal.listener_count(), 1);
}
