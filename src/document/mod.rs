use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::theme::AppliedTheme;

#[cfg(feature = "gtk")]
pub mod gtk;

#[cfg(feature = "gtk")]
pub use self::gtk::WidgetThemeTarget;

/// Where the applied theme is written for styling rules to consume.
pub trait ThemeTarget {
    fn apply_theme(&self, theme: AppliedTheme);
    fn applied_theme(&self) -> Option<AppliedTheme>;
}

/// The root element of a document: a bag of string attributes, one of which
/// carries the theme.
#[derive(Debug)]
pub struct DocumentRoot {
    theme_attribute: String,
    attributes: RefCell<BTreeMap<String, String>>,
    mutations: Cell<usize>,
}

impl DocumentRoot {
    pub fn new(theme_attribute: impl Into<String>) -> Self {
        Self {
            theme_attribute: theme_attribute.into(),
            attributes: RefCell::new(BTreeMap::new()),
            mutations: Cell::new(0),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Writes that actually changed an attribute value.
    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut attributes = self.attributes.borrow_mut();
        if attributes.get(name).map(String::as_str) == Some(value) {
            return;
        }
        attributes.insert(name.to_string(), value.to_string());
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl ThemeTarget for DocumentRoot {
    fn apply_theme(&self, theme: AppliedTheme) {
        self.set_attribute(&self.theme_attribute, theme.as_str());
    }

    fn applied_theme(&self) -> Option<AppliedTheme> {
        self.attributes
            .borrow()
            .get(&self.theme_attribute)
            .and_then(|value| value.parse().ok())
    }
}
