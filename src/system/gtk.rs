use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use gtk4::glib::SignalHandlerId;
use gtk4::prelude::ObjectExt;

use super::{scheme_from_theme_name, ColorSchemeSource, SchemeListener, SubscriptionId};
use crate::theme::ColorScheme;

/// System scheme read from `GtkSettings`, with changes delivered through
/// property notifications on the theme name and the dark-theme flag.
pub struct GtkSettingsScheme {
    settings: Option<gtk4::Settings>,
    next_id: Cell<u64>,
    handlers: RefCell<BTreeMap<SubscriptionId, Vec<SignalHandlerId>>>,
}

impl GtkSettingsScheme {
    /// Requires GTK to be initialized; without a default display the query is
    /// unavailable.
    pub fn from_default_settings() -> Self {
        Self::with_settings(gtk4::Settings::default())
    }

    pub fn with_settings(settings: Option<gtk4::Settings>) -> Self {
        Self {
            settings,
            next_id: Cell::new(0),
            handlers: RefCell::new(BTreeMap::new()),
        }
    }
}

impl ColorSchemeSource for GtkSettingsScheme {
    fn current(&self) -> Option<ColorScheme> {
        self.settings.as_ref().and_then(scheme_from_settings)
    }

    #[allow(deprecated)]
    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId> {
        let settings = self.settings.as_ref()?;

        let on_theme_name = listener.clone();
        let theme_name_handler = settings.connect_gtk_theme_name_notify(move |settings| {
            if let Some(scheme) = scheme_from_settings(settings) {
                on_theme_name(scheme);
            }
        });
        let prefer_dark_handler =
            settings.connect_gtk_application_prefer_dark_theme_notify(move |settings| {
                if let Some(scheme) = scheme_from_settings(settings) {
                    listener(scheme);
                }
            });

        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .insert(id, vec![theme_name_handler, prefer_dark_handler]);
        Some(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let Some(handlers) = self.handlers.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(settings) = self.settings.as_ref() {
            for handler in handlers {
                settings.disconnect(handler);
            }
        }
    }
}

#[allow(deprecated)]
fn scheme_from_settings(settings: &gtk4::Settings) -> Option<ColorScheme> {
    if let Some(theme_name) = settings.gtk_theme_name() {
        if let Some(scheme) = scheme_from_theme_name(theme_name.as_str()) {
            return Some(scheme);
        }
    }

    Some(ColorScheme::from_prefers_dark(
        settings.is_gtk_application_prefer_dark_theme(),
    ))
}
