mod backup_list;
mod confirm;
mod error;
mod footer;
mod header;
mod input;
mod layout;
mod menu;
mod notification;
mod theme;

pub use backup_list::{BackupListView, ListStyle};
pub use confirm::{ConfirmDeleteView, ConfirmRestoreView};
pub use error::ErrorView;
pub use footer::Footer;
pub use header::Header;
pub use input::InputView;
pub use layout::AppLayout;
pub use menu::MenuView;
pub use notification::NotificationLine;
pub use theme::Theme;
