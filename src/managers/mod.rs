// Profile data managers
// Managers read one kind of profile data each: session snapshots, bookmarks, history.

pub mod bookmark_manager;
pub mod history_manager;
pub mod session_manager;
