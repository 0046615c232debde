//! CMS collection items and the document metadata derived from them

use super::slug::to_slug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One item as returned by the collection items endpoint.
///
/// Field values may sit under `fieldData` or at the item's top level,
/// depending on the API version that produced the item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CollectionItem {
    #[serde(rename = "fieldData", default, skip_serializing_if = "Option::is_none")]
    pub field_data: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Logical fields read from an item, each backed by an ordered list of keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Slug,
    Title,
    Description,
    VideoUrl,
    Body,
    Path,
    Subpath,
    SourceFile,
    Archived,
    Draft,
}

impl Field {
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Slug => &["slug"],
            Self::Title => &["name", "title"],
            Self::Description => &["summary", "description"],
            Self::VideoUrl => &["video-link", "video-url", "videourl", "video", "videoUrl"],
            Self::Body => &["body", "content", "post-body", "rich-text"],
            Self::Path => &["path", "category-path", "folder"],
            Self::Subpath => &["subpath", "sub-path"],
            Self::SourceFile => &["sourcefile", "source-file", "source"],
            Self::Archived => &["_archived", "isArchived", "archived"],
            Self::Draft => &["_draft", "isDraft", "draft"],
        }
    }
}

impl CollectionItem {
    /// First non-null value for `field`; `fieldData` is checked before the
    /// top level for every key.
    pub fn field(&self, field: Field) -> Option<&Value> {
        field.keys().iter().find_map(|key| {
            self.field_data
                .as_ref()
                .and_then(|data| data.get(*key))
                .filter(|v| !v.is_null())
                .or_else(|| self.fields.get(*key).filter(|v| !v.is_null()))
        })
    }

    /// Text of the resolved value, or `None` when it is falsy
    pub fn text(&self, field: Field) -> Option<String> {
        self.field(field).filter(|v| is_truthy(v)).map(value_text)
    }

    pub fn flag(&self, field: Field) -> bool {
        self.field(field).is_some_and(is_truthy)
    }

    /// Item id as text, empty when absent
    pub fn id(&self) -> String {
        self.fields
            .get("id")
            .filter(|v| is_truthy(v))
            .map(value_text)
            .unwrap_or_default()
    }

    pub fn is_published(&self) -> bool {
        !self.flag(Field::Archived) && !self.flag(Field::Draft)
    }
}

/// Empty strings, `false`, zero and null are falsy; everything else is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Why an item produced no document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unpublished,
    MissingSlug,
    Collision,
}

impl SkipReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpublished => "unpublished",
            Self::MissingSlug => "missing_slug",
            Self::Collision => "collision",
        }
    }
}

/// Directory segments under the documents root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub path: String,
    pub subpath: String,
}

impl Segments {
    /// An explicit path field wins (only its first component is used);
    /// otherwise the first two components of a source file path.
    pub fn derive(item: &CollectionItem) -> Self {
        let explicit = item.text(Field::Path).map(|v| to_slug(&v)).unwrap_or_default();
        if !explicit.is_empty() {
            let path = explicit.split('/').next().unwrap_or_default().to_string();
            let subpath = item
                .text(Field::Subpath)
                .map(|v| to_slug(&v))
                .unwrap_or_default();
            return Self { path, subpath };
        }

        if let Some(Value::String(source)) = item.field(Field::SourceFile) {
            if source.contains('/') {
                let mut parts = source.split('/').map(to_slug).filter(|s| !s.is_empty());
                return Self {
                    path: parts.next().unwrap_or_default(),
                    subpath: parts.next().unwrap_or_default(),
                };
            }
        }

        Self::default()
    }
}

/// Everything needed to render and place one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDocument {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub video: Option<String>,
    pub body: String,
    pub segments: Segments,
}

impl ItemDocument {
    pub fn derive(item: &CollectionItem) -> Result<Self, SkipReason> {
        if !item.is_published() {
            return Err(SkipReason::Unpublished);
        }

        let title = item.text(Field::Title);
        let slug = item
            .text(Field::Slug)
            .or_else(|| title.clone())
            .map(|v| to_slug(&v))
            .unwrap_or_default();
        if slug.is_empty() {
            return Err(SkipReason::MissingSlug);
        }

        Ok(Self {
            id: item.id(),
            title: title.unwrap_or_else(|| slug.clone()),
            description: item.text(Field::Description).unwrap_or_default(),
            video: item.text(Field::VideoUrl),
            body: item
                .text(Field::Body)
                .map(|b| b.trim().to_string())
                .unwrap_or_default(),
            segments: Segments::derive(item),
            slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> CollectionItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_field_data_checked_before_top_level() {
        let it = item(json!({
            "name": "Top",
            "fieldData": { "name": "Inner" }
        }));
        assert_eq!(it.text(Field::Title).as_deref(), Some("Inner"));
    }

    #[test]
    fn test_key_order_beats_location() {
        // `name` at top level wins over `title` in fieldData
        let it = item(json!({
            "name": "Top name",
            "fieldData": { "title": "Inner title" }
        }));
        assert_eq!(it.text(Field::Title).as_deref(), Some("Top name"));
    }

    #[test]
    fn test_null_is_skipped_but_empty_string_wins() {
        let it = item(json!({
            "fieldData": { "name": null, "summary": "" },
            "title": "Fallback",
            "description": "Never reached"
        }));
        assert_eq!(it.text(Field::Title).as_deref(), Some("Fallback"));
        // "" is non-null so it is chosen, then treated as falsy
        assert_eq!(it.text(Field::Description), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_unpublished_items() {
        let archived = item(json!({ "fieldData": { "slug": "a", "_archived": true } }));
        let draft = item(json!({ "isDraft": true, "slug": "b" }));
        let zero_flag = item(json!({ "slug": "c", "archived": 0 }));
        assert_eq!(ItemDocument::derive(&archived), Err(SkipReason::Unpublished));
        assert_eq!(ItemDocument::derive(&draft), Err(SkipReason::Unpublished));
        assert!(ItemDocument::derive(&zero_flag).is_ok());
    }

    #[test]
    fn test_missing_slug() {
        let it = item(json!({ "fieldData": { "name": "!!!" } }));
        assert_eq!(ItemDocument::derive(&it), Err(SkipReason::MissingSlug));
        let empty = item(json!({ "id": "x" }));
        assert_eq!(ItemDocument::derive(&empty), Err(SkipReason::MissingSlug));
    }

    #[test]
    fn test_derive_document() {
        let it = item(json!({
            "id": "abc",
            "fieldData": {
                "name": "Getting Started",
                "slug": "getting-started",
                "summary": "Intro",
                "body": "  # Hello  \n",
                "video-url": "https://v.example/1"
            }
        }));
        let doc = ItemDocument::derive(&it).unwrap();
        assert_eq!(doc.id, "abc");
        assert_eq!(doc.slug, "getting-started");
        assert_eq!(doc.title, "Getting Started");
        assert_eq!(doc.description, "Intro");
        assert_eq!(doc.video.as_deref(), Some("https://v.example/1"));
        assert_eq!(doc.body, "# Hello");
        assert_eq!(doc.segments, Segments::default());
    }

    #[test]
    fn test_slug_from_title_and_title_from_slug() {
        let from_title = item(json!({ "fieldData": { "name": "My Post" } }));
        let doc = ItemDocument::derive(&from_title).unwrap();
        assert_eq!(doc.slug, "my-post");
        assert_eq!(doc.title, "My Post");

        let only_slug = item(json!({ "slug": "Only Slug" }));
        let doc = ItemDocument::derive(&only_slug).unwrap();
        assert_eq!(doc.slug, "only-slug");
        assert_eq!(doc.title, "only-slug");
        assert_eq!(doc.description, "");
        assert_eq!(doc.video, None);
    }

    #[test]
    fn test_non_string_values_become_json_text() {
        let it = item(json!({ "slug": 42, "id": 7 }));
        let doc = ItemDocument::derive(&it).unwrap();
        assert_eq!(doc.slug, "42");
        assert_eq!(doc.id, "7");
    }

    #[test]
    fn test_segments_from_explicit_path() {
        let it = item(json!({
            "fieldData": { "path": "Guides/Deep/Nested", "subpath": "Setup Basics" }
        }));
        assert_eq!(
            Segments::derive(&it),
            Segments { path: "guides".into(), subpath: "setup-basics".into() }
        );
    }

    #[test]
    fn test_segments_from_source_file() {
        let it = item(json!({ "source-file": "/Docs//API Reference/intro.md" }));
        assert_eq!(
            Segments::derive(&it),
            Segments { path: "docs".into(), subpath: "api-reference".into() }
        );

        let flat = item(json!({ "sourcefile": "intro.md" }));
        assert_eq!(Segments::derive(&flat), Segments::default());

        let not_string = item(json!({ "source": ["a/b"] }));
        assert_eq!(Segments::derive(&not_string), Segments::default());
    }

    #[test]
    fn test_explicit_path_wins_over_source_file() {
        let it = item(json!({ "folder": "Tutorials", "source": "docs/api/x.md" }));
        assert_eq!(
            Segments::derive(&it),
            Segments { path: "tutorials".into(), subpath: String::new() }
        );
    }
}
