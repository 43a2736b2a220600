use crate::theme::ThemePreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeState {
    /// Nothing resolved yet; the pre-paint phase has not run.
    #[default]
    Pending,
    Light,
    Dark,
    /// `Auto` with a live system-scheme subscription.
    AutoSubscribed,
    /// `Auto` without change notifications; the theme stays as computed.
    AutoDetached,
}

impl ThemeState {
    pub const fn for_selection(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Light => Self::Light,
            ThemePreference::Dark => Self::Dark,
            ThemePreference::Auto => Self::AutoSubscribed,
        }
    }

    pub const fn preference(self) -> Option<ThemePreference> {
        match self {
            Self::Pending => None,
            Self::Light => Some(ThemePreference::Light),
            Self::Dark => Some(ThemePreference::Dark),
            Self::AutoSubscribed | Self::AutoDetached => Some(ThemePreference::Auto),
        }
    }
}
