use gtk4::prelude::*;

use super::ThemeTarget;
use crate::theme::{AppliedTheme, ColorScheme};

const LIGHT_CLASS: &str = "theme-light";
const DARK_CLASS: &str = "theme-dark";

/// Marks a toplevel widget with `theme-light` or `theme-dark`.
///
/// Apply before `present()` so the first frame already carries the class.
#[derive(Debug, Clone)]
pub struct WidgetThemeTarget {
    widget: gtk4::Widget,
}

impl WidgetThemeTarget {
    pub fn new(widget: &impl IsA<gtk4::Widget>) -> Self {
        Self {
            widget: widget.clone().upcast(),
        }
    }
}

impl ThemeTarget for WidgetThemeTarget {
    fn apply_theme(&self, theme: AppliedTheme) {
        let (add, remove) = css_classes(theme);
        if self.widget.has_css_class(add) && !self.widget.has_css_class(remove) {
            return;
        }
        self.widget.remove_css_class(remove);
        self.widget.add_css_class(add);
    }

    fn applied_theme(&self) -> Option<AppliedTheme> {
        if self.widget.has_css_class(DARK_CLASS) {
            Some(ColorScheme::Dark)
        } else if self.widget.has_css_class(LIGHT_CLASS) {
            Some(ColorScheme::Light)
        } else {
            None
        }
    }
}

/// Class to add and class to remove for `theme`.
fn css_classes(theme: AppliedTheme) -> (&'static str, &'static str) {
    match theme {
        ColorScheme::Light => (LIGHT_CLASS, DARK_CLASS),
        ColorScheme::Dark => (DARK_CLASS, LIGHT_CLASS),
    }
}
