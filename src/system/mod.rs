//! Sources of the system color-scheme signal.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use crate::theme::ColorScheme;

#[cfg(feature = "gtk")]
pub mod gtk;

#[cfg(feature = "gtk")]
pub use self::gtk::GtkSettingsScheme;

/// Callback invoked with the new scheme on every system change.
pub type SchemeListener = Rc<dyn Fn(ColorScheme)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// The operating system's light/dark preference.
pub trait ColorSchemeSource {
    /// Current scheme, or `None` when the query is unavailable.
    fn current(&self) -> Option<ColorScheme>;

    /// Registers `listener` for change notifications. Returns `None` when the
    /// source cannot notify.
    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId>;

    fn unsubscribe(&self, id: SubscriptionId);
}

impl<C: ColorSchemeSource + ?Sized> ColorSchemeSource for Box<C> {
    fn current(&self) -> Option<ColorScheme> {
        (**self).current()
    }

    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId> {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}

impl<C: ColorSchemeSource + ?Sized> ColorSchemeSource for Rc<C> {
    fn current(&self) -> Option<ColorScheme> {
        (**self).current()
    }

    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId> {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}

/// One-shot OS query through `dark-light`. It has no change notification, so
/// `Auto` is computed once per load.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsColorScheme;

impl ColorSchemeSource for OsColorScheme {
    fn current(&self) -> Option<ColorScheme> {
        Some(match detect_os_theme() {
            OsThemeMode::Dark => ColorScheme::Dark,
            OsThemeMode::Light => ColorScheme::Light,
        })
    }

    fn subscribe(&self, _listener: SchemeListener) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}

/// A programmable source. `set_scheme` notifies every live listener.
///
/// Used for headless runs with a forced scheme and in tests.
#[derive(Default)]
pub struct SimulatedColorScheme {
    scheme: Cell<Option<ColorScheme>>,
    notifies: bool,
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<SubscriptionId, SchemeListener>>,
}

impl SimulatedColorScheme {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme: Cell::new(Some(scheme)),
            notifies: true,
            ..Self::default()
        }
    }

    /// A source whose query capability is missing entirely.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// A source that answers queries but never notifies.
    pub fn without_notifications(scheme: ColorScheme) -> Self {
        Self {
            scheme: Cell::new(Some(scheme)),
            ..Self::default()
        }
    }

    pub fn set_scheme(&self, scheme: ColorScheme) {
        self.scheme.set(Some(scheme));
        // Listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<SchemeListener> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(scheme);
        }
    }

    pub fn live_subscriptions(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for SimulatedColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedColorScheme")
            .field("scheme", &self.scheme.get())
            .field("notifies", &self.notifies)
            .field("live_subscriptions", &self.live_subscriptions())
            .finish()
    }
}

impl ColorSchemeSource for SimulatedColorScheme {
    fn current(&self) -> Option<ColorScheme> {
        self.scheme.get()
    }

    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId> {
        if !self.notifies {
            return None;
        }
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, listener);
        Some(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().remove(&id);
    }
}

/// Guess the scheme from a desktop theme name such as `Adwaita-dark`.
pub fn scheme_from_theme_name(theme_name: &str) -> Option<ColorScheme> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if normalized.contains("dark") {
        return Some(ColorScheme::Dark);
    }
    if normalized.contains("light") {
        return Some(ColorScheme::Light);
    }
    None
}
