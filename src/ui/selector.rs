use std::collections::{BTreeMap, BTreeSet};

use crate::config::ThemeSettings;
use crate::theme::ThemePreference;

/// One selectable entry in the theme selection container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorItem {
    label: String,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

impl SelectorItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }
}

/// A click somewhere inside the selector container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent {
    item: Option<usize>,
    default_prevented: bool,
}

impl ClickEvent {
    pub const fn on_item(index: usize) -> Self {
        Self {
            item: Some(index),
            default_prevented: false,
        }
    }

    /// A click on the container itself, outside any item.
    pub const fn on_container() -> Self {
        Self {
            item: None,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// The container of theme choices (a dropdown in the site navbar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSelector {
    id: String,
    item_marker: String,
    active_class: String,
    items: Vec<SelectorItem>,
}

impl ThemeSelector {
    pub fn new(id: impl Into<String>, settings: &ThemeSettings) -> Self {
        Self {
            id: id.into(),
            item_marker: settings.item_marker.clone(),
            active_class: settings.active_class.clone(),
            items: Vec::new(),
        }
    }

    /// Light, dark and auto entries, tagged with the configured marker.
    pub fn standard(settings: &ThemeSettings) -> Self {
        let mut selector = Self::new(settings.selector_id.clone(), settings);
        for (label, preference) in [
            ("Light", ThemePreference::Light),
            ("Dark", ThemePreference::Dark),
            ("Auto", ThemePreference::Auto),
        ] {
            selector.push(
                SelectorItem::new(label)
                    .with_attribute(settings.item_marker.clone(), preference.as_str()),
            );
        }
        selector
    }

    pub fn with_item(mut self, item: SelectorItem) -> Self {
        self.push(item);
        self
    }

    pub fn push(&mut self, item: SelectorItem) {
        self.items.push(item);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[SelectorItem] {
        &self.items
    }

    /// Index of the first item tagged with `preference`.
    pub fn position_of(&self, preference: ThemePreference) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.attribute(&self.item_marker) == Some(preference.as_str()))
    }

    /// Raw marker value of the clicked item, if it carries one.
    pub fn marker_for(&self, event: &ClickEvent) -> Option<&str> {
        let item = self.items.get(event.item?)?;
        item.attribute(&self.item_marker)
    }

    /// Marks every item tagged with `preference` active and all others
    /// inactive.
    pub fn mark_active(&mut self, preference: ThemePreference) {
        for item in &mut self.items {
            let matches = item.attribute(&self.item_marker) == Some(preference.as_str());
            item.toggle_class(&self.active_class, matches);
        }
    }

    pub fn active_items(&self) -> impl Iterator<Item = &SelectorItem> {
        self.items
            .iter()
            .filter(|item| item.has_class(&self.active_class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_selector_tags_every_preference() {
        let settings = ThemeSettings::default();
        let selector = ThemeSelector::standard(&settings);
        assert_eq!(selector.id(), "THEME-DROPDOWN");
        assert_eq!(selector.items().len(), 3);
        for preference in ThemePreference::ALL {
            assert!(selector.position_of(preference).is_some());
        }
    }

    #[test]
    fn mark_active_marks_exactly_the_matching_item() {
        let settings = ThemeSettings::default();
        let mut selector = ThemeSelector::standard(&settings)
            .with_item(SelectorItem::new("Help").with_class("active"));

        selector.mark_active(ThemePreference::Dark);
        let active: Vec<_> = selector.active_items().map(SelectorItem::label).collect();
        assert_eq!(active, vec!["Dark"]);

        selector.mark_active(ThemePreference::Auto);
        let active: Vec<_> = selector.active_items().map(SelectorItem::label).collect();
        assert_eq!(active, vec!["Auto"]);
    }

    #[test]
    fn marker_lookup_ignores_untagged_targets() {
        let settings = ThemeSettings::default();
        let selector = ThemeSelector::standard(&settings).with_item(SelectorItem::new("Divider"));

        assert_eq!(selector.marker_for(&ClickEvent::on_item(1)), Some("dark"));
        assert_eq!(selector.marker_for(&ClickEvent::on_item(3)), None);
        assert_eq!(selector.marker_for(&ClickEvent::on_item(42)), None);
        assert_eq!(selector.marker_for(&ClickEvent::on_container()), None);
    }

    #[test]
    fn custom_marker_and_active_class_are_respected() {
        let settings = ThemeSettings {
            item_marker: "data-mode".to_string(),
            active_class: "is-current".to_string(),
            ..ThemeSettings::default()
        };
        let mut selector = ThemeSelector::new("modes", &settings)
            .with_item(SelectorItem::new("Night").with_attribute("data-mode", "dark"))
            .with_item(SelectorItem::new("Day").with_attribute("data-theme", "light"));

        selector.mark_active(ThemePreference::Dark);
        assert!(selector.items()[0].has_class("is-current"));
        assert_eq!(selector.position_of(ThemePreference::Light), None);
    }

    #[test]
    fn prevent_default_is_recorded() {
        let mut event = ClickEvent::on_item(0);
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
