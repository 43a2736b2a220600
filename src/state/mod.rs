pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{StateTransition, ThemeEvent};
pub use machine::ThemeStateMachine;
pub use model::ThemeState;
