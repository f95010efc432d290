// Profile recovery platform paths for Windows
// Config:  %APPDATA%/ProfileRecovery
// Desktop: %USERPROFILE%/Desktop
// Profile: %LOCALAPPDATA%/Google/Chrome/User Data/Default

use std::env;
use std::path::PathBuf;

/// Returns the user profile directory on Windows.
/// `%USERPROFILE%`
pub fn get_home_dir() -> PathBuf {
    PathBuf::from(
        env::var("USERPROFILE").unwrap_or_else(|_| String::from("C:\\Users\\Default")),
    )
}

/// Returns the configuration directory on Windows.
/// `%APPDATA%/ProfileRecovery`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("ProfileRecovery")
}

pub fn get_desktop_dir() -> PathBuf {
    get_home_dir().join("Desktop")
}

/// `%LOCALAPPDATA%/Google/Chrome/User Data/Default`
pub fn default_profile_dir() -> PathBuf {
    let local_appdata = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local_appdata)
        .join("Google")
        .join("Chrome")
        .join("User Data")
        .join("Default")
}
