// Profile recovery platform abstraction
// Provides platform-specific paths for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::{Path, PathBuf};

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the user's home directory.
pub fn get_home_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_home_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_home_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_home_dir()
    }
}

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/profile-recovery` (or `$XDG_CONFIG_HOME/profile-recovery`)
/// - **macOS**: `~/Library/Application Support/ProfileRecovery`
/// - **Windows**: `%APPDATA%/ProfileRecovery`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the user's Desktop directory. It may not exist.
pub fn get_desktop_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_desktop_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_desktop_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_desktop_dir()
    }
}

/// Returns the default Chrome profile folder.
///
/// - **Linux**: `~/.config/google-chrome/Default`
/// - **macOS**: `~/Library/Application Support/Google/Chrome/Default`
/// - **Windows**: `%LOCALAPPDATA%/Google/Chrome/User Data/Default`
pub fn default_profile_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::default_profile_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::default_profile_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::default_profile_dir()
    }
}

/// Where recovery output goes: `explicit` if given, else the Desktop,
/// else the home directory.
pub fn resolve_output_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let desktop = get_desktop_dir();
    if desktop.is_dir() {
        desktop
    } else {
        get_home_dir()
    }
}
