mod action;
mod input;
mod selection;
mod state;

pub use action::Action;
pub use input::TextInput;
pub use selection::SelectionSet;
pub use state::{AppMode, AppState, ListPurpose, MAIN_MENU_ITEMS, Notification};
