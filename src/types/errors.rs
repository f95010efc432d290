use std::fmt;

// === FormatError ===

/// Errors that make a whole snapshot file unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The file does not start with the snapshot signature.
    BadMagic([u8; 4]),
    /// The file ended before the header was complete.
    TruncatedHeader { expected: usize, actual: usize },
    /// The header declares a version this reader does not handle.
    UnsupportedVersion(i32),
    /// The file could not be opened or read.
    Io(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::BadMagic(found) => {
                write!(f, "Bad snapshot signature: {:02X?}", found)
            }
            FormatError::TruncatedHeader { expected, actual } => write!(
                f,
                "Truncated snapshot header: expected {} bytes, got {}",
                expected, actual
            ),
            FormatError::UnsupportedVersion(version) => {
                write!(f, "Unsupported snapshot version: {}", version)
            }
            FormatError::Io(msg) => write!(f, "Snapshot I/O error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

// === HistoryError ===

/// Errors related to reading the history database.
#[derive(Debug)]
pub enum HistoryError {
    /// The history database file was not found.
    NotFound(String),
    /// Database operation failed.
    DatabaseError(String),
    /// Copying the database to a private location failed.
    IoError(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::NotFound(path) => write!(f, "History database not found: {}", path),
            HistoryError::DatabaseError(msg) => write!(f, "History database error: {}", msg),
            HistoryError::IoError(msg) => write!(f, "History I/O error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

// === BookmarkError ===

/// Errors related to reading the bookmark tree.
#[derive(Debug)]
pub enum BookmarkError {
    /// The bookmark file was not found.
    NotFound(String),
    /// The bookmark file is not valid JSON of the expected shape.
    ParseError(String),
    /// The bookmark file could not be read.
    IoError(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(path) => write!(f, "Bookmark file not found: {}", path),
            BookmarkError::ParseError(msg) => write!(f, "Bookmark parse error: {}", msg),
            BookmarkError::IoError(msg) => write!(f, "Bookmark I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BookmarkError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading settings.
    IoError(String),
    /// Failed to deserialize settings.
    SerializationError(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === ProfileError ===

/// Errors related to the selected profile folder.
#[derive(Debug)]
pub enum ProfileError {
    /// The path does not exist or is not a directory.
    NotADirectory(String),
    /// The directory contains none of the files a browser profile has.
    NotAProfile(String),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::NotADirectory(path) => write!(f, "Not a directory: {}", path),
            ProfileError::NotAProfile(path) => write!(
                f,
                "Not a browser profile (no Bookmarks, History, or session files): {}",
                path
            ),
        }
    }
}

impl std::error::Error for ProfileError {}

// === RenderError ===

/// Errors related to writing the HTML outputs.
#[derive(Debug)]
pub enum RenderError {
    /// The output file could not be written.
    IoError(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::IoError(msg) => write!(f, "Render I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

// === RecoveryError ===

/// Top-level errors that stop a recovery run.
#[derive(Debug)]
pub enum RecoveryError {
    Profile(ProfileError),
    Settings(SettingsError),
    Render(RenderError),
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::Profile(e) => write!(f, "{}", e),
            RecoveryError::Settings(e) => write!(f, "{}", e),
            RecoveryError::Render(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RecoveryError {}

impl From<ProfileError> for RecoveryError {
    fn from(e: ProfileError) -> Self {
        RecoveryError::Profile(e)
    }
}

impl From<SettingsError> for RecoveryError {
    fn from(e: SettingsError) -> Self {
        RecoveryError::Settings(e)
    }
}

impl From<RenderError> for RecoveryError {
    fn from(e: RenderError) -> Self {
        RecoveryError::Render(e)
    }
}
