// Profile recovery platform paths for macOS
// Config:  ~/Library/Application Support/ProfileRecovery
// Desktop: ~/Desktop
// Profile: ~/Library/Application Support/Google/Chrome/Default

use std::env;
use std::path::PathBuf;

/// Returns the home directory on macOS.
pub fn get_home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

fn application_support() -> PathBuf {
    get_home_dir().join("Library").join("Application Support")
}

/// Returns the configuration directory on macOS.
/// `~/Library/Application Support/ProfileRecovery`
pub fn get_config_dir() -> PathBuf {
    application_support().join("ProfileRecovery")
}

/// `~/Desktop`
pub fn get_desktop_dir() -> PathBuf {
    get_home_dir().join("Desktop")
}

pub fn default_profile_dir() -> PathBuf {
    application_support()
        .join("Google")
        .join("Chrome")
        .join("Default")
}
