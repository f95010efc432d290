//! HTML text helpers shared by the renderers.

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Browser-internal pages that cannot be opened from a saved link.
pub fn is_internal_url(url: &str) -> bool {
    const INTERNAL_SCHEMES: [&str; 5] = [
        "chrome://",
        "chrome-extension://",
        "chrome-search://",
        "chrome-untrusted://",
        "devtools://",
    ];
    let lower = url.trim_start().to_ascii_lowercase();
    INTERNAL_SCHEMES.iter().any(|s| lower.starts_with(s))
}
