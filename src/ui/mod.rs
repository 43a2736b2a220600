pub mod selector;

pub use selector::{ClickEvent, SelectorItem, ThemeSelector};
