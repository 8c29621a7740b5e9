//! Application views

mod bookmarks;
mod landing;

pub use bookmarks::Bookmarks;
pub use landing::Landing;
