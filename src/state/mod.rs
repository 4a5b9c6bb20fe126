//! Client-side state: the document/conversation store and its reducer.

mod store;

pub use store::{reduce, Action, AppState, AppStore};
