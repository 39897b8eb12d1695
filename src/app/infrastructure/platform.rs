//! OS color-scheme signal.

use dark_light::Mode;
use std::cell::Cell;
use std::rc::Rc;

use crate::app::domain::theme::ResolvedTheme;
use crate::app::services::observers::{Observers, Subscription};

/// Source of the operating system's preferred color scheme.
///
/// Listeners fire only when the scheme actually changes.
pub trait ColorSchemeSignal {
    fn current(&self) -> ResolvedTheme;
    fn listen(&self, listener: Box<dyn FnMut(ResolvedTheme)>) -> Subscription;
}

/// Reads the OS preference once. Unknown or undetectable is treated as light.
pub fn detect_system_scheme() -> ResolvedTheme {
    match dark_light::detect() {
        Mode::Dark => ResolvedTheme::Dark,
        Mode::Light | Mode::Default => ResolvedTheme::Light,
    }
}

#[derive(Clone)]
struct SignalCore {
    current: Rc<Cell<ResolvedTheme>>,
    listeners: Observers<ResolvedTheme>,
}

impl SignalCore {
    fn new(initial: ResolvedTheme) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
            listeners: Observers::new(),
        }
    }

    fn update(&self, scheme: ResolvedTheme) -> bool {
        if self.current.get() == scheme {
            return false;
        }
        self.current.set(scheme);
        self.listeners.notify(&scheme);
        true
    }

    fn listen(&self, mut listener: Box<dyn FnMut(ResolvedTheme)>) -> Subscription {
        self.listeners.subscribe(move |scheme: &ResolvedTheme| listener(*scheme))
    }
}

/// Signal driven by the host, e.g. from a webview's `prefers-color-scheme`
/// media query event. Clones share state.
#[derive(Clone)]
pub struct ManualSignal {
    core: SignalCore,
}

impl ManualSignal {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            core: SignalCore::new(ResolvedTheme::from_dark(prefers_dark)),
        }
    }

    /// Push a new value. Returns whether it differed from the previous one.
    pub fn set_prefers_dark(&self, prefers_dark: bool) -> bool {
        self.core.update(ResolvedTheme::from_dark(prefers_dark))
    }

    pub fn listener_count(&self) -> usize {
        self.core.listeners.len()
    }
}

impl ColorSchemeSignal for ManualSignal {
    fn current(&self) -> ResolvedTheme {
        self.core.current.get()
    }

    fn listen(&self, listener: Box<dyn FnMut(ResolvedTheme)>) -> Subscription {
        self.core.listen(listener)
    }
}

/// Signal backed by the operating system setting.
///
/// The host event loop calls [`refresh`](OsColorScheme::refresh) when the
/// platform reports a settings change (or on focus); listeners only hear
/// about real transitions.
#[derive(Clone)]
pub struct OsColorScheme {
    core: SignalCore,
    detector: fn() -> ResolvedTheme,
}

impl OsColorScheme {
    pub fn new() -> Self {
        Self::with_detector(detect_system_scheme)
    }

    pub fn with_detector(detector: fn() -> ResolvedTheme) -> Self {
        Self {
            core: SignalCore::new(detector()),
            detector,
        }
    }

    /// Re-read the OS preference and notify listeners if it changed.
    pub fn refresh(&self) -> ResolvedTheme {
        let scheme = (self.detector)();
        if self.core.update(scheme) {
            tracing::debug!(target: "roomledger::theme", scheme = %scheme, "OS color scheme changed");
        }
        scheme
    }
}

impl Default for OsColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSignal for OsColorScheme {
    fn current(&self) -> ResolvedTheme {
        self.core.current.get()
    }

    fn listen(&self, listener: Box<dyn FnMut(ResolvedTheme)>) -> Subscription {
        self.core.listen(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_manual_signal_fires_only_on_change() {
        let signal = ManualSignal::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = signal.listen(Box::new(move |s| seen_clone.borrow_mut().push(s)));

        assert!(!signal.set_prefers_dark(false));
        assert!(signal.set_prefers_dark(true));
        assert!(!signal.set_prefers_dark(true));
        assert!(signal.set_prefers_dark(false));

        assert_eq!(*seen.borrow(), vec![ResolvedTheme::Dark, ResolvedTheme::Light]);
        assert_eq!(signal.current(), ResolvedTheme::Light);
    }

    #[test]
    fn test_manual_signal_unlisten() {
        let signal = ManualSignal::new(true);
        let sub = signal.listen(Box::new(|_| {}));
        assert_eq!(signal.listener_count(), 1);
        sub.unsubscribe();
        assert_eq!(signal.listener_count(), 0);
    }

    thread_local! {
        static FAKE_OS_DARK: Cell<bool> = const { Cell::new(false) };
    }

    fn fake_detector() -> ResolvedTheme {
        ResolvedTheme::from_dark(FAKE_OS_DARK.with(|d| d.get()))
    }

    #[test]
    fn test_os_scheme_refresh_notifies_on_transition() {
        FAKE_OS_DARK.with(|d| d.set(false));
        let signal = OsColorScheme::with_detector(fake_detector);
        assert_eq!(signal.current(), ResolvedTheme::Light);

        let count = Rc::new(Cell::new(0));
        let count_clone = Rc::clone(&count);
        let _sub = signal.listen(Box::new(move |_| count_clone.set(count_clone.get() + 1)));

        assert_eq!(signal.refresh(), ResolvedTheme::Light);
        assert_eq!(count.get(), 0);

        FAKE_OS_DARK.with(|d| d.set(true));
        assert_eq!(signal.refresh(), ResolvedTheme::Dark);
        assert_eq!(signal.refresh(), ResolvedTheme::Dark);
        assert_eq!(count.get(), 1);
        assert_eq!(signal.current(), ResolvedTheme::Dark);
    }
}
