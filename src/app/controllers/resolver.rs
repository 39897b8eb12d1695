//! Theme resolution state machine.
//!
//! A [`ThemeResolver`] owns the user's [`ThemePreference`], derives the
//! [`ResolvedTheme`] from it and the OS color-scheme signal, persists the
//! preference, and notifies subscribers synchronously whenever the resolved
//! state changes.
//!
//! There is no global instance. Build one per UI session and pass clones of
//! the handle to whatever needs it (toggle controls, page chrome).
//!
//! # Failure policy
//!
//! Nothing here fails visibly. Invalid input, unreadable or unwritable
//! storage, and panicking subscribers are logged through `tracing` and
//! absorbed. The (preference, resolved) pair is updated and broadcast in a
//! single synchronous step, so subscribers never observe a mixed state.
//!
//! # Re-entrancy
//!
//! A subscriber may call [`ThemeResolver::set_theme`] from inside its
//! callback. That is allowed but discouraged: the nested call runs its own
//! full notification round before the outer round resumes.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Instant;

use crate::app::domain::settings::ResolverSettings;
use crate::app::domain::theme::{ResolvedTheme, ThemeChange, ThemePreference};
use crate::app::infrastructure::platform::ColorSchemeSignal;
use crate::app::infrastructure::storage::PreferenceStore;
use crate::app::services::observers::{Observers, Subscription};
use crate::ui::theme::ThemeSurface;

struct ResolverState {
    preference: ThemePreference,
    resolved: ResolvedTheme,
    initialized: bool,
    signal_subscription: Option<Subscription>,
    transition_until: Option<Instant>,
    store: Box<dyn PreferenceStore>,
    surface: Box<dyn ThemeSurface>,
}

struct Inner {
    state: RefCell<ResolverState>,
    signal: Box<dyn ColorSchemeSignal>,
    observers: Observers<ThemeChange>,
    settings: ResolverSettings,
}

/// Handle to a theme resolver. Clones share the same state.
#[derive(Clone)]
pub struct ThemeResolver {
    inner: Rc<Inner>,
}

impl ThemeResolver {
    pub fn new<S, C, U>(store: S, signal: C, surface: U, settings: ResolverSettings) -> Self
    where
        S: PreferenceStore + 'static,
        C: ColorSchemeSignal + 'static,
        U: ThemeSurface + 'static,
    {
        let preference = ThemePreference::default();
        let resolved = preference.resolve(signal.current());
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(ResolverState {
                    preference,
                    resolved,
                    initialized: false,
                    signal_subscription: None,
                    transition_until: None,
                    store: Box::new(store),
                    surface: Box::new(surface),
                }),
                signal: Box::new(signal),
                observers: Observers::new(),
                settings,
            }),
        }
    }

    /// Load the stored preference, start tracking the OS signal and apply
    /// the resolved theme. Calling it again while initialized does nothing.
    ///
    /// Subscribers are not notified; they read the initial state directly.
    pub fn initialize(&self) {
        if self.inner.state.borrow().initialized {
            tracing::debug!(target: "roomledger::theme", "Theme resolver already initialized");
            return;
        }

        let preference = self.load_preference();
        let listener = self.signal_listener();
        let subscription = self.inner.signal.listen(listener);
        let transition = self.inner.settings.transition();

        let mut state = self.inner.state.borrow_mut();
        state.preference = preference;
        state.resolved = preference.resolve(self.inner.signal.current());
        state.signal_subscription = Some(subscription);
        state.initialized = true;

        let resolved = state.resolved;
        state.surface.apply(resolved);
        if !transition.is_zero() {
            state.surface.set_transitioning(true);
            state.transition_until = Some(Instant::now() + transition);
        }

        tracing::debug!(
            target: "roomledger::theme",
            preference = %preference,
            resolved = %resolved,
            "Theme resolver initialized"
        );
    }

    fn load_preference(&self) -> ThemePreference {
        let key = &self.inner.settings.storage_key;
        let stored = self.inner.state.borrow().store.get(key);
        match stored {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                tracing::debug!(
                    target: "roomledger::theme",
                    value = %raw,
                    "Ignoring unrecognized stored theme preference"
                );
                ThemePreference::default()
            }),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                tracing::warn!(target: "roomledger::theme", error = %e, "Could not read theme preference");
                ThemePreference::default()
            }
        }
    }

    fn signal_listener(&self) -> Box<dyn FnMut(ResolvedTheme)> {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Box::new(move |scheme| {
            if let Some(inner) = weak.upgrade() {
                ThemeResolver { inner }.handle_system_change(scheme);
            }
        })
    }

    fn handle_system_change(&self, scheme: ResolvedTheme) {
        let change = {
            let mut state = self.inner.state.borrow_mut();
            if state.preference != ThemePreference::System {
                tracing::debug!(
                    target: "roomledger::theme",
                    scheme = %scheme,
                    preference = %state.preference,
                    "OS color scheme changed, explicit preference wins"
                );
                return;
            }
            if state.resolved == scheme {
                return;
            }
            state.resolved = scheme;
            state.surface.apply(scheme);
            ThemeChange {
                preference: ThemePreference::System,
                resolved_theme: scheme,
            }
        };
        self.inner.observers.notify(&change);
    }

    /// Select a preference: resolve, apply, persist, notify.
    ///
    /// A failed write is logged; the new theme still applies for this
    /// session.
    pub fn set_theme(&self, preference: ThemePreference) {
        let change = {
            let mut state = self.inner.state.borrow_mut();
            let change = ThemeChange::new(preference, self.inner.signal.current());
            state.preference = change.preference;
            state.resolved = change.resolved_theme;
            state.surface.apply(change.resolved_theme);

            let key = &self.inner.settings.storage_key;
            if let Err(e) = state.store.set(key, preference.as_str()) {
                tracing::warn!(
                    target: "roomledger::theme",
                    error = %e,
                    "Could not persist theme preference, keeping it for this session only"
                );
            }
            change
        };

        tracing::debug!(
            target: "roomledger::theme",
            preference = %change.preference,
            resolved = %change.resolved_theme,
            "Theme changed"
        );
        self.inner.observers.notify(&change);
    }

    /// String boundary for [`set_theme`](Self::set_theme). Values other than
    /// `light`, `dark` and `system` are rejected with a warning and leave the
    /// state untouched.
    pub fn set_theme_str(&self, candidate: &str) {
        match candidate.parse::<ThemePreference>() {
            Ok(preference) => self.set_theme(preference),
            Err(e) => {
                tracing::warn!(target: "roomledger::theme", error = %e, "Rejected theme change");
            }
        }
    }

    pub fn get_theme(&self) -> ThemePreference {
        self.inner.state.borrow().preference
    }

    pub fn get_resolved_theme(&self) -> ResolvedTheme {
        self.inner.state.borrow().resolved
    }

    /// Snapshot of the current pair, in notification shape.
    pub fn current(&self) -> ThemeChange {
        let state = self.inner.state.borrow();
        ThemeChange {
            preference: state.preference,
            resolved_theme: state.resolved,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.get_resolved_theme().is_dark()
    }

    pub fn is_light(&self) -> bool {
        !self.is_dark()
    }

    /// Whether the *stated* preference is `system`, whatever it resolves to.
    pub fn is_system(&self) -> bool {
        self.get_theme() == ThemePreference::System
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.state.borrow().initialized
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&ThemeChange) + 'static,
    {
        self.inner.observers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.inner.settings
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.state.borrow().transition_until.is_some()
    }

    /// Clear the startup transition marker once its interval has elapsed.
    /// Returns whether the transition is still running.
    pub fn poll_transition(&self) -> bool {
        let mut state = self.inner.state.borrow_mut();
        match state.transition_until {
            Some(deadline) if Instant::now() >= deadline => {
                state.transition_until = None;
                state.surface.set_transitioning(false);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Stop tracking the OS signal and drop every subscriber. The resolver
    /// can be initialized again afterwards.
    pub fn destroy(&self) {
        let subscription = {
            let mut state = self.inner.state.borrow_mut();
            state.initialized = false;
            if state.transition_until.take().is_some() {
                state.surface.set_transitioning(false);
            }
            state.signal_subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.inner.observers.clear();
        tracing::debug!(target: "roomledger::theme", "Theme resolver torn down");
    }
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ThemeResolver")
            .field("preference", &state.preference)
            .field("resolved", &state.resolved)
            .field("initialized", &state.initialized)
            .field("subscribers", &self.inner.observers.len())
            .finish()
    }
}
