//! Bookmark Manager for profile recovery.
//!
//! Implements `BookmarkManagerTrait`: reading the profile's `Bookmarks`
//! JSON file into a [`BookmarkTree`] via `serde_json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::bookmark::{BookmarkNode, BookmarkTree};
use crate::types::errors::BookmarkError;

/// File name of the bookmark store inside a profile.
pub const BOOKMARKS_FILE: &str = "Bookmarks";

/// Roots read from the store, in display order. `synced` is left out.
pub const BOOKMARK_ROOTS: [&str; 2] = ["bookmark_bar", "other"];

const UNTITLED: &str = "Untitled";

/// Trait defining bookmark read operations.
pub trait BookmarkManagerTrait {
    fn load_tree(&self) -> Result<BookmarkTree, BookmarkError>;
}

/// Bookmark manager rooted at one profile folder.
pub struct BookmarkManager {
    path: PathBuf,
}

/// Node as stored on disk. Fields the browser adds (ids, guids, dates) are ignored.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    url: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawStore {
    #[serde(default)]
    roots: serde_json::Map<String, serde_json::Value>,
}

impl BookmarkManager {
    pub fn new<P: AsRef<Path>>(profile_dir: P) -> Self {
        Self {
            path: profile_dir.as_ref().join(BOOKMARKS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    /// Reads and parses the bookmark store.
    fn load_tree(&self) -> Result<BookmarkTree, BookmarkError> {
        let json = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BookmarkError::NotFound(self.path.display().to_string()),
            _ => BookmarkError::IoError(e.to_string()),
        })?;
        let tree = parse_bookmarks(&json)?;
        tracing::debug!(
            path = %self.path.display(),
            bookmarks = tree.bookmark_count(),
            "read bookmark store"
        );
        Ok(tree)
    }
}

/// Parses the contents of a `Bookmarks` file.
///
/// Roots that are missing or not folders are skipped. Nodes of an unknown
/// type are dropped along with their children.
pub fn parse_bookmarks(json: &str) -> Result<BookmarkTree, BookmarkError> {
    let store: RawStore =
        serde_json::from_str(json).map_err(|e| BookmarkError::ParseError(e.to_string()))?;

    let mut roots = Vec::new();
    for key in BOOKMARK_ROOTS {
        let Some(value) = store.roots.get(key) else {
            continue;
        };
        let raw: RawNode = serde_json::from_value(value.clone())
            .map_err(|e| BookmarkError::ParseError(format!("root {}: {}", key, e)))?;
        if let Some(node @ BookmarkNode::Folder { .. }) = convert(raw) {
            roots.push(node);
        }
    }
    Ok(BookmarkTree { roots })
}

fn convert(raw: RawNode) -> Option<BookmarkNode> {
    let name = raw.name.unwrap_or_else(|| UNTITLED.to_string());
    match raw.kind.as_deref() {
        Some("folder") => Some(BookmarkNode::Folder {
            name,
            children: raw.children.into_iter().filter_map(convert).collect(),
        }),
        Some("url") => Some(BookmarkNode::Url {
            name,
            url: raw.url.unwrap_or_default(),
        }),
        _ => None,
    }
}
