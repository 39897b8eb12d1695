use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::app::domain::theme::ResolvedTheme;

pub const TRANSITION_CLASS: &str = "theme-transition";

/// The visual root the resolved theme is applied to.
pub trait ThemeSurface {
    /// Swap the theme marker. Implementations must never expose a state
    /// with both or neither theme applied.
    fn apply(&mut self, theme: ResolvedTheme);

    fn set_transitioning(&mut self, on: bool);
}

/// Class list of the document root, e.g. `<html class="dark">`.
///
/// Clones share the same list so the host can read it back after handing
/// one to the resolver.
#[derive(Debug, Clone, Default)]
pub struct RootClasses {
    classes: Rc<RefCell<BTreeSet<String>>>,
}

impl RootClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    /// Theme currently marked on the root, if any.
    pub fn theme(&self) -> Option<ResolvedTheme> {
        let classes = self.classes.borrow();
        if classes.contains(ResolvedTheme::Dark.as_str()) {
            Some(ResolvedTheme::Dark)
        } else if classes.contains(ResolvedTheme::Light.as_str()) {
            Some(ResolvedTheme::Light)
        } else {
            None
        }
    }
}

impl ThemeSurface for RootClasses {
    fn apply(&mut self, theme: ResolvedTheme) {
        let mut classes = self.classes.borrow_mut();
        let stale = match theme {
            ResolvedTheme::Light => ResolvedTheme::Dark,
            ResolvedTheme::Dark => ResolvedTheme::Light,
        };
        classes.remove(stale.as_str());
        classes.insert(theme.as_str().to_string());
    }

    fn set_transitioning(&mut self, on: bool) {
        let mut classes = self.classes.borrow_mut();
        if on {
            classes.insert(TRANSITION_CLASS.to_string());
        } else {
            classes.remove(TRANSITION_CLASS);
        }
    }
}
