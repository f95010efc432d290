// Profile recovery platform paths for Linux
// Config:  ~/.config/profile-recovery
// Desktop: ~/Desktop
// Profile: ~/.config/google-chrome/Default

use std::env;
use std::path::PathBuf;

/// Returns the home directory on Linux.
pub fn get_home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory on Linux.
/// Uses `$XDG_CONFIG_HOME/profile-recovery` if set, otherwise `~/.config/profile-recovery`.
pub fn get_config_dir() -> PathBuf {
    xdg_config_home().join("profile-recovery")
}

/// `~/Desktop`
pub fn get_desktop_dir() -> PathBuf {
    get_home_dir().join("Desktop")
}

/// Default Chrome profile, under the XDG config home.
pub fn default_profile_dir() -> PathBuf {
    xdg_config_home().join("google-chrome").join("Default")
}

fn xdg_config_home() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => get_home_dir().join(".config"),
    }
}
