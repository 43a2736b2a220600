use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ThemeSettings;
use crate::document::ThemeTarget;
use crate::state::{ThemeEvent, ThemeState, ThemeStateMachine};
use crate::storage::{PreferenceStore, SafeStore};
use crate::system::{ColorSchemeSource, SchemeListener, SubscriptionId};
use crate::ui::{ClickEvent, ThemeSelector};

use super::{preference_from_stored, resolve, AppliedTheme, ColorScheme, ThemePreference};

/// Owns the persisted preference, the system subscription and the bound
/// selector for one session of a page or window.
///
/// Run [`pre_paint`](Self::pre_paint) before the first frame, then
/// [`on_interactive`](Self::on_interactive) once the UI exists.
pub struct ThemeController<S, C, T>
where
    S: PreferenceStore,
    C: ColorSchemeSource,
    T: ThemeTarget + 'static,
{
    settings: ThemeSettings,
    store: SafeStore<S>,
    source: C,
    target: Rc<T>,
    machine: Rc<RefCell<ThemeStateMachine>>,
    subscription: Option<SubscriptionId>,
    selector: Option<ThemeSelector>,
}

impl<S, C, T> ThemeController<S, C, T>
where
    S: PreferenceStore,
    C: ColorSchemeSource,
    T: ThemeTarget + 'static,
{
    pub fn new(settings: ThemeSettings, store: S, source: C, target: Rc<T>) -> Self {
        Self {
            settings,
            store: SafeStore::new(store),
            source,
            target,
            machine: Rc::new(RefCell::new(ThemeStateMachine::new())),
            subscription: None,
            selector: None,
        }
    }

    /// Resolves and writes the theme synchronously. Nothing here waits on
    /// the UI.
    pub fn pre_paint(&mut self) -> AppliedTheme {
        let key = self.settings.storage_key.clone();
        let preference = match self.store.read(&key) {
            Some(raw) => match raw.parse::<ThemePreference>() {
                Ok(preference) => preference,
                Err(err) => {
                    tracing::warn!(%err, "ignoring stored theme; resetting to auto");
                    self.store.write(&key, ThemePreference::Auto.as_str());
                    ThemePreference::Auto
                }
            },
            None => {
                self.store.write(&key, ThemePreference::Auto.as_str());
                ThemePreference::Auto
            }
        };

        let applied = self.apply(preference);
        tracing::info!(%preference, %applied, "applied theme before first paint");
        applied
    }

    /// Re-applies the stored preference and binds the selection UI. Safe to
    /// run after [`pre_paint`](Self::pre_paint): the theme does not change
    /// and only one system subscription stays live.
    pub fn on_interactive(&mut self, selector: Option<ThemeSelector>) -> AppliedTheme {
        match selector {
            Some(selector) => {
                tracing::debug!(id = selector.id(), "bound theme selector");
                self.selector = Some(selector);
            }
            None => tracing::debug!("no theme selector present; skipping UI binding"),
        }

        let preference =
            preference_from_stored(self.store.read(&self.settings.storage_key).as_deref());
        let applied = self.set_theme(preference);
        tracing::info!(%preference, %applied, "theme controller interactive");
        applied
    }

    /// Persists `preference`, writes the resolved theme and syncs the
    /// selector's active marker.
    pub fn set_theme(&mut self, preference: ThemePreference) -> AppliedTheme {
        self.store
            .write(&self.settings.storage_key, preference.as_str());
        let applied = self.apply(preference);
        if let Some(selector) = self.selector.as_mut() {
            selector.mark_active(preference);
        }
        applied
    }

    /// Delegated click handling for the bound selector. Returns the selected
    /// preference when the click landed on a tagged item.
    pub fn handle_click(&mut self, event: &mut ClickEvent) -> Option<ThemePreference> {
        let raw = self.selector.as_ref()?.marker_for(event)?.to_string();
        event.prevent_default();
        match raw.parse::<ThemePreference>() {
            Ok(preference) => {
                self.set_theme(preference);
                Some(preference)
            }
            Err(err) => {
                tracing::warn!(%err, "theme selector item carries an unknown value");
                None
            }
        }
    }

    pub fn applied_theme(&self) -> AppliedTheme {
        self.target
            .applied_theme()
            .unwrap_or_else(|| resolve(self.preference(), self.system_scheme()))
    }

    pub fn preference(&self) -> ThemePreference {
        self.state().preference().unwrap_or_default()
    }

    pub fn state(&self) -> ThemeState {
        self.machine.borrow().state()
    }

    pub fn has_live_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn selector(&self) -> Option<&ThemeSelector> {
        self.selector.as_ref()
    }

    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    pub fn store(&self) -> &SafeStore<S> {
        &self.store
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn target(&self) -> &Rc<T> {
        &self.target
    }

    fn apply(&mut self, preference: ThemePreference) -> AppliedTheme {
        self.release_subscription();
        self.transition(ThemeEvent::Select(preference));

        let applied = match preference {
            ThemePreference::Auto => self.system_scheme(),
            explicit => resolve(explicit, ColorScheme::default()),
        };
        self.target.apply_theme(applied);

        if preference.is_auto() {
            self.subscribe_to_system();
        }
        applied
    }

    fn system_scheme(&self) -> ColorScheme {
        self.source.current().unwrap_or_else(|| {
            tracing::debug!("system color scheme query unavailable; assuming light");
            ColorScheme::Light
        })
    }

    fn subscribe_to_system(&mut self) {
        let machine = Rc::clone(&self.machine);
        let target = Rc::clone(&self.target);
        let listener: SchemeListener = Rc::new(move |scheme: ColorScheme| {
            let accepted = machine
                .borrow_mut()
                .transition(ThemeEvent::SystemSchemeChanged(scheme))
                .is_ok();
            if accepted {
                tracing::debug!(%scheme, "system color scheme changed");
                target.apply_theme(scheme);
            }
        });

        match self.source.subscribe(listener) {
            Some(id) => self.subscription = Some(id),
            None => {
                tracing::debug!("system color scheme cannot notify; auto theme is fixed");
                self.transition(ThemeEvent::Detach);
            }
        }
    }

    fn release_subscription(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
        }
    }

    fn transition(&self, event: ThemeEvent) {
        if let Err(err) = self.machine.borrow_mut().transition(event) {
            tracing::warn!(%err, "theme state machine rejected event");
        }
    }
}

impl<S, C, T> Drop for ThemeController<S, C, T>
where
    S: PreferenceStore,
    C: ColorSchemeSource,
    T: ThemeTarget + 'static,
{
    fn drop(&mut self) {
        self.release_subscription();
    }
}

impl<S, C, T> std::fmt::Debug for ThemeController<S, C, T>
where
    S: PreferenceStore,
    C: ColorSchemeSource,
    T: ThemeTarget + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("state", &self.state())
            .field("subscription", &self.subscription)
            .field("selector", &self.selector.as_ref().map(ThemeSelector::id))
            .finish()
    }
}
