//! Netscape bookmark file export.
//!
//! Writes the recovered bookmark tree in the format every major browser's
//! "Import bookmarks from HTML file" accepts.

use std::fs;
use std::path::Path;

use crate::services::markup::escape_html;
use crate::types::bookmark::{BookmarkNode, BookmarkTree};
use crate::types::errors::RenderError;

const HEADER: [&str; 8] = [
    "<!DOCTYPE NETSCAPE-Bookmark-file-1>",
    "<!-- This is an automatically generated file.",
    "     It will be read and overwritten.",
    "     DO NOT EDIT! -->",
    "<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">",
    "<TITLE>Bookmarks</TITLE>",
    "<H1>Bookmarks</H1>",
    "<DL><p>",
];

/// Renders `tree` as a Netscape bookmark file.
pub fn render_netscape(tree: &BookmarkTree) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
    for root in &tree.roots {
        write_node(root, 1, &mut lines);
    }
    lines.push("</DL><p>".to_string());
    lines.join("\n")
}

/// Writes the export to `path`.
pub fn write_netscape(path: &Path, tree: &BookmarkTree) -> Result<(), RenderError> {
    fs::write(path, render_netscape(tree))
        .map_err(|e| RenderError::IoError(format!("{}: {}", path.display(), e)))?;
    tracing::info!(
        path = %path.display(),
        bookmarks = tree.bookmark_count(),
        "wrote bookmark export"
    );
    Ok(())
}

fn write_node(node: &BookmarkNode, indent: usize, lines: &mut Vec<String>) {
    let prefix = "    ".repeat(indent);
    match node {
        BookmarkNode::Folder { name, children } => {
            lines.push(format!("{}<DT><H3>{}</H3>", prefix, escape_html(name)));
            lines.push(format!("{}<DL><p>", prefix));
            for child in children {
                write_node(child, indent + 1, lines);
            }
            lines.push(format!("{}</DL><p>", prefix));
        }
        BookmarkNode::Url { name, url } => {
            lines.push(format!(
                "{}<DT><A HREF=\"{}\">{}</A>",
                prefix,
                escape_html(url),
                escape_html(name)
            ));
        }
    }
}
