// Immutable app state and the single reducer that produces new snapshots

pub mod action;
pub mod container;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use container::{StateListener, Store};
pub use reducer::{reduce, MissingTargetPolicy};
pub use state::AppState;
