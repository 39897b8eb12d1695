use std::cell::RefCell;
use std::rc::Rc;

use crate::app::domain::theme::{ResolvedTheme, ThemeChange, ThemePreference};
use crate::app::services::observers::Subscription;

use super::resolver::ThemeResolver;

/// What the toggle button shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub preference: ThemePreference,
    pub resolved: ResolvedTheme,
    pub icon: &'static str,
    pub label: String,
}

impl ToggleView {
    pub fn from_change(change: &ThemeChange) -> Self {
        let icon = match change.preference {
            ThemePreference::Light => "sun",
            ThemePreference::Dark => "moon",
            ThemePreference::System => "monitor",
        };
        let label = match change.preference {
            ThemePreference::System => format!("System ({})", change.resolved_theme),
            other => other.display_name().to_string(),
        };
        Self {
            preference: change.preference,
            resolved: change.resolved_theme,
            icon,
            label,
        }
    }
}

/// Binds a theme toggle control to a resolver.
///
/// Each click moves to the next preference (light, dark, system). The
/// redraw callback runs once when bound and after every change.
pub struct ThemeToggle {
    resolver: ThemeResolver,
    view: Rc<RefCell<ToggleView>>,
    subscription: Subscription,
}

impl ThemeToggle {
    pub fn bind<F>(resolver: &ThemeResolver, mut redraw: F) -> Self
    where
        F: FnMut(&ToggleView) + 'static,
    {
        let initial = ToggleView::from_change(&resolver.current());
        redraw(&initial);
        let view = Rc::new(RefCell::new(initial));

        let view_clone = Rc::clone(&view);
        let subscription = resolver.subscribe(move |change| {
            let next = ToggleView::from_change(change);
            *view_clone.borrow_mut() = next.clone();
            redraw(&next);
        });

        Self {
            resolver: resolver.clone(),
            view,
            subscription,
        }
    }

    pub fn click(&self) {
        let next = self.resolver.get_theme().next();
        self.resolver.set_theme(next);
    }

    pub fn select(&self, preference: ThemePreference) {
        self.resolver.set_theme(preference);
    }

    pub fn view(&self) -> ToggleView {
        self.view.borrow().clone()
    }

    /// Detach from the resolver; the control stops redrawing.
    pub fn unbind(self) {
        self.subscription.unsubscribe();
    }
}
