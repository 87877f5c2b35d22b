#![forbid(unsafe_code)]

//! Light/dark theme switch with a persisted preference.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::ThemeConfig;
use crate::dom::{Dom, ElementId, selectors};
use crate::error::StorageError;
use crate::timer::{Scheduler, TimerTask};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored preference. Anything but `"dark"` means light.
    #[must_use]
    pub fn from_preference(raw: Option<&str>) -> Self {
        match raw {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub const fn from_checked(checked: bool) -> Self {
        if checked { Self::Dark } else { Self::Light }
    }
}

/// Key/value persistence for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory [`PreferenceStore`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, like storage disabled by the
    /// browser.
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.unavailable.set(true);
        store
    }

    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Applies the theme to the page and keeps the preference in sync.
#[derive(Debug, Clone)]
pub struct ThemeController {
    switch: Option<ElementId>,
    config: ThemeConfig,
    theme: Theme,
}

impl ThemeController {
    /// Read the stored preference and apply it.
    ///
    /// A failing store falls back to the light theme.
    pub fn init<D, S>(dom: &D, store: &S, config: ThemeConfig) -> Self
    where
        D: Dom + ?Sized,
        S: PreferenceStore + ?Sized,
    {
        let switch = dom.by_id(selectors::THEME_SWITCH_ID);
        if switch.is_none() {
            tracing::debug!(target: "folio.theme", "theme switch missing");
        }
        let stored = store.get(&config.storage_key).unwrap_or_else(|err| {
            tracing::warn!(target: "folio.theme", error = %err, "theme preference unreadable");
            None
        });
        let theme = Theme::from_preference(stored.as_deref());
        if theme == Theme::Dark {
            if let Some(body) = dom.body() {
                dom.set_attribute(body, selectors::DATA_THEME, Theme::Dark.as_str());
            }
            if let Some(switch) = switch {
                dom.set_checked(switch, true);
            }
        }
        tracing::debug!(target: "folio.theme", theme = theme.as_str(), "theme applied");
        Self {
            switch,
            config,
            theme,
        }
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub const fn switch(&self) -> Option<ElementId> {
        self.switch
    }

    /// Handle a change of the switch.
    pub fn on_change<D, S>(&mut self, dom: &D, store: &S, scheduler: &Scheduler, checked: bool) -> Theme
    where
        D: Dom + ?Sized,
        S: PreferenceStore + ?Sized,
    {
        let theme = Theme::from_checked(checked);
        self.theme = theme;

        let secs = self.config.transition_ms as f64 / 1000.0;
        if let Some(body) = dom.body() {
            match theme {
                Theme::Dark => dom.set_attribute(body, selectors::DATA_THEME, theme.as_str()),
                Theme::Light => dom.remove_attribute(body, selectors::DATA_THEME),
            }
            dom.set_style(
                body,
                "transition",
                &format!("background-color {secs}s ease, color {secs}s ease"),
            );
            scheduler.schedule_in(
                Duration::from_millis(self.config.transition_ms),
                TimerTask::set_style(body, "transition", ""),
            );
        }
        if let Some(root) = dom.root() {
            dom.set_style(root, "--transition-speed", &format!("{secs}s"));
        }

        if let Err(err) = store.set(&self.config.storage_key, theme.as_str()) {
            tracing::warn!(target: "folio.theme", error = %err, "theme preference not saved");
        }
        tracing::debug!(target: "folio.theme", theme = theme.as_str(), "theme toggled");
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;

    use pretty_assertions::assert_eq;

    fn page() -> (MemoryDom, ElementId) {
        let dom = MemoryDom::new();
        let switch = dom.element("input").id("theme-switch").append();
        (dom, switch)
    }

    #[test]
    fn defaults_to_light_without_preference() {
        let (dom, switch) = page();
        let theme = ThemeController::init(&dom, &MemoryStorage::new(), ThemeConfig::default());
        assert_eq!(theme.theme(), Theme::Light);
        assert!(!dom.is_checked(switch));
        let body = dom.body().unwrap();
        assert_eq!(dom.attribute(body, "data-theme"), None);
    }

    #[test]
    fn stored_dark_preference_is_applied() {
        let (dom, switch) = page();
        let store = MemoryStorage::new().with_entry("theme", "dark");
        let theme = ThemeController::init(&dom, &store, ThemeConfig::default());
        assert_eq!(theme.theme(), Theme::Dark);
        assert!(dom.is_checked(switch));
        let body = dom.body().unwrap();
        assert_eq!(dom.attribute(body, "data-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn toggle_sets_transition_and_clears_it_later() {
        let (dom, _switch) = page();
        let store = MemoryStorage::new();
        let scheduler = Scheduler::new();
        let mut theme = ThemeController::init(&dom, &store, ThemeConfig::default());
        theme.on_change(&dom, &store, &scheduler, true);

        let body = dom.body().unwrap();
        let root = dom.root().unwrap();
        assert_eq!(
            dom.style(body, "transition").as_deref(),
            Some("background-color 0.3s ease, color 0.3s ease")
        );
        assert_eq!(dom.style(root, "--transition-speed").as_deref(), Some("0.3s"));

        scheduler.run_due(&dom, Duration::from_millis(300));
        assert_eq!(dom.style(body, "transition"), None);
    }

    #[test]
    fn unavailable_storage_does_not_block_toggle() {
        let (dom, _switch) = page();
        let store = MemoryStorage::unavailable();
        let scheduler = Scheduler::new();
        let mut theme = ThemeController::init(&dom, &store, ThemeConfig::default());
        assert_eq!(theme.on_change(&dom, &store, &scheduler, true), Theme::Dark);
        let body = dom.body().unwrap();
        assert_eq!(dom.attribute(body, "data-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn unknown_preference_means_light() {
        assert_eq!(Theme::from_preference(Some("sepia")), Theme::Light);
        assert_eq!(Theme::from_preference(None), Theme::Light);
    }
}
