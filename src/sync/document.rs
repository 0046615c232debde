//! Markdown rendering for synced items

use super::item::ItemDocument;

/// Escape a value for a double-quoted frontmatter string
pub fn escape_frontmatter(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Frontmatter block, a blank line, then the body. The result is trimmed and
/// ends with exactly one newline.
pub fn render_document(doc: &ItemDocument) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("title: \"{}\"", escape_frontmatter(&doc.title)),
        format!("description: \"{}\"", escape_frontmatter(&doc.description)),
        "source: \"webflow\"".to_string(),
        format!("webflowItemId: \"{}\"", escape_frontmatter(&doc.id)),
        format!("slug: \"{}\"", escape_frontmatter(&doc.slug)),
    ];
    if let Some(video) = doc.video.as_deref().filter(|v| !v.is_empty()) {
        lines.push(format!("video: \"{}\"", escape_frontmatter(video)));
    }
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(doc.body.clone());

    let mut rendered = lines.join("\n").trim().to_string();
    rendered.push('\n');
    rendered
}
