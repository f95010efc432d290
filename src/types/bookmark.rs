use serde::{Deserialize, Serialize};

/// A node of the profile's bookmark tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkNode {
    Folder {
        name: String,
        children: Vec<BookmarkNode>,
    },
    Url {
        name: String,
        url: String,
    },
}

impl BookmarkNode {
    pub fn name(&self) -> &str {
        match self {
            BookmarkNode::Folder { name, .. } | BookmarkNode::Url { name, .. } => name,
        }
    }

    /// Number of URL bookmarks in this subtree.
    pub fn bookmark_count(&self) -> usize {
        match self {
            BookmarkNode::Folder { children, .. } => {
                children.iter().map(BookmarkNode::bookmark_count).sum()
            }
            BookmarkNode::Url { .. } => 1,
        }
    }

    /// Pre-order walk yielding `(depth, node)`.
    pub fn walk(&self) -> Vec<(usize, &BookmarkNode)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a BookmarkNode)>) {
        out.push((depth, self));
        if let BookmarkNode::Folder { children, .. } = self {
            for child in children {
                child.walk_into(depth + 1, out);
            }
        }
    }
}

/// The top-level folders of a profile (bookmark bar, other bookmarks).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookmarkTree {
    pub roots: Vec<BookmarkNode>,
}

impl BookmarkTree {
    pub fn bookmark_count(&self) -> usize {
        self.roots.iter().map(BookmarkNode::bookmark_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
