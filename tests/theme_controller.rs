use std::rc::Rc;

use sitetheme::config::ThemeSettings;
use sitetheme::document::{DocumentRoot, ThemeTarget};
use sitetheme::storage::{MemoryStore, PreferenceStore, StorageError, StorageResult};
use sitetheme::system::SimulatedColorScheme;
use sitetheme::ui::{ClickEvent, ThemeSelector};
use sitetheme::{ColorScheme, ThemeController, ThemePreference};

struct ThrowingStore;

impl PreferenceStore for ThrowingStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("SecurityError".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("QuotaExceededError".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("SecurityError".to_string()))
    }
}

struct Page {
    store: Rc<MemoryStore>,
    system: Rc<SimulatedColorScheme>,
    root: Rc<DocumentRoot>,
    controller: ThemeController<Rc<MemoryStore>, Rc<SimulatedColorScheme>, DocumentRoot>,
}

impl Page {
    fn load(stored: Option<&str>, system: ColorScheme) -> Self {
        let settings = ThemeSettings::default();
        let store = Rc::new(match stored {
            Some(value) => MemoryStore::with_entry("theme", value),
            None => MemoryStore::new(),
        });
        let system = Rc::new(SimulatedColorScheme::new(system));
        let root = Rc::new(DocumentRoot::new("data-theme"));
        let mut controller = ThemeController::new(
            settings.clone(),
            Rc::clone(&store),
            Rc::clone(&system),
            Rc::clone(&root),
        );
        controller.pre_paint();
        controller.on_interactive(Some(ThemeSelector::standard(&settings)));
        Self {
            store,
            system,
            root,
            controller,
        }
    }

    fn stored(&self) -> Option<String> {
        self.store.get("theme").unwrap()
    }

    fn root_theme(&self) -> Option<String> {
        self.root.attribute("data-theme")
    }
}

#[test]
fn no_stored_value_with_dark_system() {
    let page = Page::load(None, ColorScheme::Dark);
    assert_eq!(page.stored().as_deref(), Some("auto"));
    assert_eq!(page.root_theme().as_deref(), Some("dark"));
}

#[test]
fn explicit_light_overrides_dark_system() {
    let page = Page::load(Some("light"), ColorScheme::Dark);
    assert_eq!(page.root_theme().as_deref(), Some("light"));
    assert_eq!(page.system.live_subscriptions(), 0);
}

#[test]
fn clicking_dark_item_persists_and_marks_it_active() {
    let mut page = Page::load(None, ColorScheme::Light);
    let dark = page
        .controller
        .selector()
        .and_then(|selector| selector.position_of(ThemePreference::Dark))
        .unwrap();

    let mut click = ClickEvent::on_item(dark);
    page.controller.handle_click(&mut click);

    assert!(click.is_default_prevented());
    assert_eq!(page.stored().as_deref(), Some("dark"));
    assert_eq!(page.root_theme().as_deref(), Some("dark"));
    let selector = page.controller.selector().unwrap();
    let active: Vec<_> = selector.active_items().collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].attribute("data-theme"), Some("dark"));
}

#[test]
fn auto_tracks_system_flip_without_rewriting_store() {
    let mut page = Page::load(Some("dark"), ColorScheme::Light);
    page.controller.set_theme(ThemePreference::Auto);
    assert_eq!(page.root_theme().as_deref(), Some("light"));

    page.system.set_scheme(ColorScheme::Dark);
    assert_eq!(page.root_theme().as_deref(), Some("dark"));
    assert_eq!(page.stored().as_deref(), Some("auto"));
}

#[test]
fn explicit_choice_after_auto_ignores_system_flips() {
    let mut page = Page::load(None, ColorScheme::Light);
    assert_eq!(page.system.live_subscriptions(), 1);

    page.controller.set_theme(ThemePreference::Dark);
    page.system.set_scheme(ColorScheme::Light);

    assert_eq!(page.system.live_subscriptions(), 0);
    assert_eq!(page.root_theme().as_deref(), Some("dark"));
}

#[test]
fn same_preference_twice_keeps_one_subscription() {
    let mut page = Page::load(Some("auto"), ColorScheme::Dark);
    let mutations = page.root.mutations();

    let first = page.controller.set_theme(ThemePreference::Auto);
    let second = page.controller.set_theme(ThemePreference::Auto);

    assert_eq!(first, second);
    assert_eq!(page.root.mutations(), mutations);
    assert_eq!(page.system.live_subscriptions(), 1);
}

#[test]
fn throwing_storage_and_missing_system_query_still_load() {
    let settings = ThemeSettings::default();
    let root = Rc::new(DocumentRoot::new(settings.root_attribute.clone()));
    let mut controller = ThemeController::new(
        settings.clone(),
        ThrowingStore,
        SimulatedColorScheme::unavailable(),
        Rc::clone(&root),
    );

    controller.pre_paint();
    assert_eq!(root.attribute("data-theme").as_deref(), Some("light"));

    controller.on_interactive(Some(ThemeSelector::standard(&settings)));
    assert_eq!(root.applied_theme(), Some(ColorScheme::Light));
    assert_eq!(controller.applied_theme(), ColorScheme::Light);
}
