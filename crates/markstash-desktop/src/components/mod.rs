//! UI Components
//!
//! Reusable UI components for the desktop application.

mod add_bookmark;
mod bookmark_card;
mod info_modal;
mod search_bar;
mod stats_bar;
mod view_toggle;

pub use add_bookmark::AddBookmark;
pub use bookmark_card::BookmarkCard;
pub use info_modal::InfoModal;
pub use search_bar::SearchBar;
pub use stats_bar::StatsBar;
pub use view_toggle::ViewToggle;
