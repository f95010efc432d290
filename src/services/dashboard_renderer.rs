//! Recovery dashboard renderer.
//!
//! Renders a [`RecoveredProfile`] as one self-contained HTML page with
//! Open Tabs, Bookmarks and Browsing History sections.

use std::fs;
use std::path::Path;

use crate::services::markup::{escape_html, is_internal_url};
use crate::types::bookmark::{BookmarkNode, BookmarkTree};
use crate::types::errors::RenderError;
use crate::types::history::HistoryEntry;
use crate::types::profile::RecoveredProfile;
use crate::types::session::{RecoveredSession, Tab};
use crate::types::settings::RecoverySettings;

/// Deepest bookmark indentation level with its own style.
pub const MAX_BOOKMARK_INDENT: usize = 5;

const STYLE: &str = r#"<style>
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    max-width: 900px; margin: 40px auto; padding: 0 20px;
    color: #333; background: #fafafa;
  }
  h1 { font-size: 28px; margin-bottom: 8px; }
  .subtitle { color: #888; margin-bottom: 32px; }
  h2 { font-size: 20px; margin: 32px 0 16px; padding-bottom: 8px; border-bottom: 2px solid #ddd; }
  h3.window { font-size: 16px; margin: 20px 0 8px; }
  .tab-list, .history-list { list-style: none; }
  .tab-list li, .history-list li {
    padding: 8px 0; border-bottom: 1px solid #eee;
  }
  .tab-list li.active > a { font-weight: 600; }
  .tab-list a, .history-list a, .bookmark-link {
    color: #1a73e8; text-decoration: none;
  }
  .tab-list a:hover, .history-list a:hover, .bookmark-link:hover {
    text-decoration: underline;
  }
  .badge { background: #e8f0fe; color: #1a73e8; border-radius: 4px; font-size: 11px; padding: 1px 6px; margin-right: 6px; }
  .nav-history { margin: 6px 0 0 24px; font-size: 12px; color: #888; }
  .nav-history li { border-bottom: none; padding: 2px 0; }
  .nav-history li.current { color: #333; font-weight: 600; }
  .url-display { color: #888; font-size: 12px; display: block; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
  .timestamp { color: #888; font-size: 12px; margin-left: 8px; }
  .folder { font-weight: 600; margin-top: 12px; padding: 4px 0; }
  .bookmark-item { padding: 3px 0; }
  .indent-1 { padding-left: 20px; }
  .indent-2 { padding-left: 40px; }
  .indent-3 { padding-left: 60px; }
  .indent-4 { padding-left: 80px; }
  .indent-5 { padding-left: 100px; }
  .section-count { color: #888; font-weight: normal; font-size: 14px; }
  .empty-note { color: #999; font-style: italic; padding: 12px 0; }
  nav { margin-bottom: 24px; }
  nav a { margin-right: 16px; color: #1a73e8; text-decoration: none; font-weight: 500; }
  nav a:hover { text-decoration: underline; }
</style>"#;

/// Renders the dashboard page according to the recovery settings.
pub struct DashboardRenderer<'a> {
    settings: &'a RecoverySettings,
}

impl<'a> DashboardRenderer<'a> {
    pub fn new(settings: &'a RecoverySettings) -> Self {
        Self { settings }
    }

    /// Renders the full page.
    pub fn render(&self, profile: &RecoveredProfile) -> String {
        let mut parts: Vec<String> = vec![
            "<!DOCTYPE html>".to_string(),
            "<html lang=\"en\">".to_string(),
            "<head>".to_string(),
            "<meta charset=\"UTF-8\">".to_string(),
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
                .to_string(),
            "<title>Chrome Recovery</title>".to_string(),
            STYLE.to_string(),
            "</head>".to_string(),
            "<body>".to_string(),
            "<h1>Chrome Recovery</h1>".to_string(),
            "<p class=\"subtitle\">Recovered from Chrome profile data</p>".to_string(),
            "<nav>".to_string(),
        ];

        if profile.tabs.is_some() {
            parts.push("<a href=\"#tabs\">Open Tabs</a>".to_string());
        }
        parts.push("<a href=\"#bookmarks\">Bookmarks</a>".to_string());
        if profile.history.is_some() {
            parts.push("<a href=\"#history\">History</a>".to_string());
        }
        parts.push("</nav>".to_string());

        self.render_tabs(profile.tabs.as_ref(), &mut parts);
        render_bookmarks(profile.bookmarks.as_ref(), &mut parts);
        self.render_history(profile.history.as_deref(), &mut parts);

        parts.push("</body></html>".to_string());
        parts.join("\n")
    }

    /// Renders and writes the page to `path`.
    pub fn write_to(&self, path: &Path, profile: &RecoveredProfile) -> Result<(), RenderError> {
        fs::write(path, self.render(profile))
            .map_err(|e| RenderError::IoError(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), "wrote recovery dashboard");
        Ok(())
    }

    fn shows(&self, url: &str) -> bool {
        self.settings.include_internal_urls || !is_internal_url(url)
    }

    fn render_tabs(&self, session: Option<&RecoveredSession>, parts: &mut Vec<String>) {
        let Some(session) = session else {
            parts.push("<h2 id=\"tabs\">Open Tabs</h2>".to_string());
            parts.push(
                "<p class=\"empty-note\">Could not recover open tabs from session files.</p>"
                    .to_string(),
            );
            return;
        };

        // Per window: (is active, tab) for every tab that is shown.
        let windows: Vec<Vec<(bool, &Tab)>> = session
            .windows
            .iter()
            .map(|window| {
                window
                    .tabs
                    .iter()
                    .enumerate()
                    .filter(|(_, tab)| tab.is_listed(self.settings.include_internal_urls))
                    .map(|(i, tab)| (window.active_tab_index == Some(i), tab))
                    .collect::<Vec<_>>()
            })
            .filter(|tabs| !tabs.is_empty())
            .collect();
        let shown: usize = windows.iter().map(Vec::len).sum();

        parts.push(format!(
            "<h2 id=\"tabs\">Open Tabs <span class=\"section-count\">({})</span></h2>",
            shown
        ));
        if shown == 0 {
            parts.push("<p class=\"empty-note\">No open tabs found.</p>".to_string());
            return;
        }

        for (number, tabs) in windows.iter().enumerate() {
            parts.push(format!(
                "<h3 class=\"window\">Window {} <span class=\"section-count\">({})</span></h3>",
                number + 1,
                tabs.len()
            ));
            parts.push("<ul class=\"tab-list\">".to_string());
            for (active, tab) in tabs {
                self.render_tab(tab, *active, parts);
            }
            parts.push("</ul>".to_string());
        }
    }

    fn render_tab(&self, tab: &Tab, active: bool, parts: &mut Vec<String>) {
        let Some(entry) = tab.current_entry() else {
            return;
        };
        let mut item = String::from(if active { "<li class=\"active\">" } else { "<li>" });
        if tab.pinned {
            item.push_str("<span class=\"badge\">Pinned</span>");
        }
        item.push_str(&link(&entry.url, &entry.title));
        item.push_str(&format!(
            "<span class=\"url-display\">{}</span>",
            escape_html(&entry.url)
        ));

        if self.settings.show_navigation_history && tab.navigations.len() > 1 {
            item.push_str("<ol class=\"nav-history\">");
            for (i, nav) in tab.navigations.iter().enumerate() {
                if !self.shows(&nav.url) {
                    continue;
                }
                let class = if i == tab.current_index { " class=\"current\"" } else { "" };
                item.push_str(&format!("<li{}>{}</li>", class, link(&nav.url, &nav.title)));
            }
            item.push_str("</ol>");
        }
        item.push_str("</li>");
        parts.push(item);
    }

    fn render_history(&self, history: Option<&[HistoryEntry]>, parts: &mut Vec<String>) {
        let Some(history) = history else {
            parts.push("<h2 id=\"history\">Browsing History</h2>".to_string());
            parts.push(
                "<p class=\"empty-note\">Could not recover browsing history.</p>".to_string(),
            );
            return;
        };

        let shown: Vec<&HistoryEntry> = history.iter().filter(|e| self.shows(&e.url)).collect();
        parts.push(format!(
            "<h2 id=\"history\">Browsing History <span class=\"section-count\">({})</span></h2>",
            shown.len()
        ));
        if shown.is_empty() {
            parts.push("<p class=\"empty-note\">No history entries found.</p>".to_string());
            return;
        }

        parts.push("<ul class=\"history-list\">".to_string());
        for entry in shown {
            parts.push(format!(
                "<li>{}<span class=\"timestamp\">{}</span><span class=\"url-display\">{}</span></li>",
                link(&entry.url, &entry.title),
                escape_html(&entry.visit_time_display()),
                escape_html(&entry.url)
            ));
        }
        parts.push("</ul>".to_string());
    }
}

fn render_bookmarks(tree: Option<&BookmarkTree>, parts: &mut Vec<String>) {
    parts.push("<h2 id=\"bookmarks\">Bookmarks</h2>".to_string());
    let Some(tree) = tree else {
        parts.push("<p class=\"empty-note\">Could not recover bookmarks.</p>".to_string());
        return;
    };
    if tree.bookmark_count() == 0 {
        parts.push("<p class=\"empty-note\">No bookmarks found.</p>".to_string());
        return;
    }

    parts.push(format!(
        "<p class=\"section-count\">{} bookmarks</p>",
        tree.bookmark_count()
    ));
    for root in &tree.roots {
        for (depth, node) in root.walk() {
            let indent = depth.min(MAX_BOOKMARK_INDENT);
            match node {
                BookmarkNode::Folder { name, .. } => parts.push(format!(
                    "<div class=\"folder indent-{}\">{}</div>",
                    indent,
                    escape_html(name)
                )),
                BookmarkNode::Url { name, url } => parts.push(format!(
                    "<div class=\"bookmark-item indent-{}\"><a class=\"bookmark-link\" href=\"{}\">{}</a></div>",
                    indent,
                    escape_html(url),
                    escape_html(name)
                )),
            }
        }
    }
}

/// Anchor showing the title, or the URL when the title is empty.
fn link(url: &str, title: &str) -> String {
    let text = if title.trim().is_empty() { url } else { title };
    format!("<a href=\"{}\">{}</a>", escape_html(url), escape_html(text))
}
