//! Webflow content sync
//!
//! Pulls every item of a CMS collection and mirrors it into the docs tree as
//! Markdown with frontmatter. A document already on disk for a slug keeps its
//! location, unchanged documents are never rewritten, and a manifest records
//! the files produced by the run.

pub mod client;
pub mod document;
pub mod error;
pub mod item;
pub mod manifest;
pub mod slug;

pub use client::{fetch_all_items, ItemSource, WebflowClient};
pub use error::{Result, SyncError};
pub use item::{CollectionItem, ItemDocument, SkipReason};
pub use manifest::Manifest;
pub use slug::{to_slug, SlugIndex};

use crate::config::SyncConfig;
use crate::logger;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Skipped item counts by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub unpublished: usize,
    pub missing_slug: usize,
    pub collision: usize,
}

impl SkipCounts {
    pub const fn total(&self) -> usize {
        self.unpublished + self.missing_slug + self.collision
    }

    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Unpublished => self.unpublished += 1,
            SkipReason::MissingSlug => self.missing_slug += 1,
            SkipReason::Collision => self.collision += 1,
        }
    }
}

/// Outcome of one sync run
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub total: usize,
    pub written: usize,
    pub unchanged: usize,
    pub skipped: SkipCounts,
    /// Files produced, relative to the project root, sorted
    pub files: Vec<String>,
    /// Files in the previous manifest that this run no longer produced
    pub stale: Vec<String>,
}

impl SyncReport {
    pub fn summary(&self) -> String {
        format!(
            "Webflow sync complete. Total items: {}, written: {}, skipped: {}",
            self.total,
            self.written,
            self.skipped.total()
        )
    }
}

pub struct SyncRunner<S> {
    config: SyncConfig,
    source: S,
    collection_id: String,
}

impl<S: ItemSource> SyncRunner<S> {
    pub fn new(config: SyncConfig, source: S, collection_id: impl Into<String>) -> Self {
        Self {
            config,
            source,
            collection_id: collection_id.into(),
        }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let docs_dir = self.config.docs_path();
        let manifest_path = self.config.manifest_path();

        fs::create_dir_all(&docs_dir).map_err(|e| SyncError::io(&docs_dir, e))?;
        let index = SlugIndex::scan(&docs_dir, &manifest_path)?;
        logger::log_debug(&format!("Indexed {} existing documents", index.len()));

        let items =
            fetch_all_items(&self.source, &self.collection_id, self.config.page_size).await?;
        let previous = Manifest::read(&manifest_path);

        let mut report = SyncReport {
            total: items.len(),
            ..SyncReport::default()
        };
        // A slug or a file belongs to the first item that reaches it
        let mut claimed_slugs: HashMap<String, PathBuf> = HashMap::new();
        let mut claimed_files = HashSet::new();

        for item in &items {
            let doc = match ItemDocument::derive(item) {
                Ok(doc) => doc,
                Err(reason) => {
                    logger::log_debug(&format!(
                        "Skipping item '{}': {}",
                        item.id(),
                        reason.as_str()
                    ));
                    report.skipped.record(reason);
                    continue;
                }
            };

            let file_path = index
                .get(&doc.slug)
                .map_or_else(|| target_path(&docs_dir, &doc), Path::to_path_buf);

            if let Some(owner) = claimed_slugs.get(&doc.slug) {
                logger::log_warning(&format!(
                    "Item '{}' has slug '{}' already written to {}; skipping",
                    doc.id,
                    doc.slug,
                    owner.display()
                ));
                report.skipped.record(SkipReason::Collision);
                continue;
            }
            if !claimed_files.insert(file_path.clone()) {
                logger::log_warning(&format!(
                    "Item '{}' resolves to {} which another item already wrote; skipping",
                    doc.id,
                    file_path.display()
                ));
                report.skipped.record(SkipReason::Collision);
                continue;
            }
            claimed_slugs.insert(doc.slug.clone(), file_path.clone());

            if write_if_changed(&file_path, &document::render_document(&doc))? {
                logger::log_debug(&format!("Wrote {}", file_path.display()));
                report.written += 1;
            } else {
                report.unchanged += 1;
            }
            report.files.push(self.relative(&file_path));
        }

        report.files.sort();
        let manifest = Manifest::new(report.files.clone());
        manifest.write(&manifest_path)?;

        if let Some(previous) = previous {
            report.stale = manifest.stale_since(&previous);
            for file in &report.stale {
                logger::log_warning(&format!("No longer produced by Webflow: {file}"));
            }
        }

        Ok(report)
    }

    /// Path relative to the project root with `/` separators
    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.config.project_root).unwrap_or(path);
        rel.to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// `{docs}/{path}/{subpath}/{slug}.md`, empty segments and empty slug
/// components omitted
fn target_path(docs_dir: &Path, doc: &ItemDocument) -> PathBuf {
    let mut path = docs_dir.to_path_buf();
    for segment in [&doc.segments.path, &doc.segments.subpath] {
        if !segment.is_empty() {
            path.push(segment);
        }
    }

    let mut parts: Vec<&str> = doc.slug.split('/').filter(|p| !p.is_empty()).collect();
    if let Some(name) = parts.pop() {
        path.extend(parts);
        path.push(format!("{name}.md"));
    }
    path
}

/// Write `content` unless the file already holds exactly these bytes.
/// Returns whether a write happened.
fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(SyncError::io(path, e)),
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| SyncError::io(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    /// Serves a fixed item list in pages, or fails every request
    struct FixedSource {
        items: Vec<Value>,
        fail: bool,
    }

    impl FixedSource {
        fn new(items: Vec<Value>) -> Self {
            Self { items, fail: false }
        }
    }

    impl ItemSource for FixedSource {
        async fn fetch_page(
            &self,
            _collection_id: &str,
            offset: usize,
            limit: usize,
        ) -> Result<Vec<CollectionItem>> {
            if self.fail {
                return Err(SyncError::Api {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(self
                .items
                .iter()
                .skip(offset)
                .take(limit)
                .map(|v| serde_json::from_value(v.clone()).unwrap())
                .collect())
        }
    }

    fn config_for(root: &TempDir) -> SyncConfig {
        SyncConfig {
            project_root: root.path().to_path_buf(),
            ..SyncConfig::default()
        }
    }

    fn runner(root: &TempDir, items: Vec<Value>) -> SyncRunner<FixedSource> {
        SyncRunner::new(config_for(root), FixedSource::new(items), "col")
    }

    fn getting_started() -> Value {
        json!({
            "id": "abc",
            "fieldData": {
                "name": "Getting Started",
                "slug": "getting-started",
                "summary": "Intro",
                "body": "# Hello"
            }
        })
    }

    #[tokio::test]
    async fn test_writes_document_and_manifest() {
        let root = tempfile::tempdir().unwrap();
        let report = runner(&root, vec![getting_started()]).run().await.unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.written, 1);
        assert_eq!(report.files, vec!["src/content/docs/getting-started.md"]);
        assert_eq!(
            report.summary(),
            "Webflow sync complete. Total items: 1, written: 1, skipped: 0"
        );

        let doc = root.path().join("src/content/docs/getting-started.md");
        assert_eq!(
            fs::read_to_string(doc).unwrap(),
            "---\ntitle: \"Getting Started\"\ndescription: \"Intro\"\nsource: \"webflow\"\n\
             webflowItemId: \"abc\"\nslug: \"getting-started\"\n---\n\n# Hello\n"
        );

        let manifest = Manifest::read(&config_for(&root).manifest_path()).unwrap();
        assert_eq!(manifest.files, report.files);
    }

    #[tokio::test]
    async fn test_top_level_fields() {
        let root = tempfile::tempdir().unwrap();
        let item = json!({
            "id": "abc",
            "slug": "Getting Started!",
            "name": "Getting Started",
            "body": "Hello"
        });
        let report = runner(&root, vec![item]).run().await.unwrap();
        assert_eq!(report.files, vec!["src/content/docs/getting-started.md"]);

        let text =
            fs::read_to_string(root.path().join("src/content/docs/getting-started.md")).unwrap();
        assert!(text.contains("slug: \"getting-started\"\n"));
        assert!(text.contains("webflowItemId: \"abc\"\n"));
        assert!(text.contains("source: \"webflow\"\n"));
        assert!(text.ends_with("---\n\nHello\n"));
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let items = vec![
            getting_started(),
            json!({ "id": "2", "fieldData": { "name": "Setup", "path": "guides", "subpath": "basics" } }),
        ];

        let first = runner(&root, items.clone()).run().await.unwrap();
        assert_eq!(first.written, 2);

        let doc = root.path().join("src/content/docs/getting-started.md");
        let modified = fs::metadata(&doc).unwrap().modified().unwrap();

        let second = runner(&root, items).run().await.unwrap();
        assert_eq!(second.written, 0);
        assert_eq!(second.unchanged, 2);
        assert_eq!(second.files, first.files);
        assert!(second.stale.is_empty());
        assert_eq!(fs::metadata(&doc).unwrap().modified().unwrap(), modified);
    }

    #[tokio::test]
    async fn test_new_document_uses_segments() {
        let root = tempfile::tempdir().unwrap();
        let item = json!({
            "id": "2",
            "fieldData": { "name": "Setup Basics", "path": "Guides", "subpath": "First Steps" }
        });
        let report = runner(&root, vec![item]).run().await.unwrap();
        assert_eq!(
            report.files,
            vec!["src/content/docs/guides/first-steps/setup-basics.md"]
        );
    }

    #[tokio::test]
    async fn test_existing_file_keeps_its_location() {
        let root = tempfile::tempdir().unwrap();
        let legacy = root.path().join("src/content/docs/legacy");
        fs::create_dir_all(&legacy).unwrap();
        fs::write(legacy.join("getting-started.md"), "old").unwrap();

        let mut item = getting_started();
        item["fieldData"]["path"] = json!("guides");
        item["fieldData"]["subpath"] = json!("intro");

        let report = runner(&root, vec![item]).run().await.unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.files, vec!["src/content/docs/legacy/getting-started.md"]);
        assert!(fs::read_to_string(legacy.join("getting-started.md"))
            .unwrap()
            .contains("title: \"Getting Started\""));
        assert!(!root.path().join("src/content/docs/guides").exists());
    }

    #[tokio::test]
    async fn test_skips_are_counted_by_reason() {
        let root = tempfile::tempdir().unwrap();
        let items = vec![
            getting_started(),
            json!({ "id": "d", "fieldData": { "slug": "draft", "_draft": true } }),
            json!({ "id": "a", "isArchived": true, "slug": "archived" }),
            json!({ "id": "n", "fieldData": { "summary": "no name" } }),
            json!({ "id": "dup", "fieldData": { "name": "Getting Started!" } }),
        ];
        let report = runner(&root, items).run().await.unwrap();

        assert_eq!(report.total, 5);
        assert_eq!(report.written, 1);
        assert_eq!(
            report.skipped,
            SkipCounts { unpublished: 2, missing_slug: 1, collision: 1 }
        );
        // first claimant keeps the file
        let doc = root.path().join("src/content/docs/getting-started.md");
        assert!(fs::read_to_string(doc).unwrap().contains("webflowItemId: \"abc\""));
    }

    #[tokio::test]
    async fn test_same_slug_in_two_directories_is_stable_across_runs() {
        let root = tempfile::tempdir().unwrap();
        let items = vec![
            json!({ "id": "1", "fieldData": { "name": "Intro", "path": "a" } }),
            json!({ "id": "2", "fieldData": { "name": "Intro", "path": "b" } }),
        ];

        let first = runner(&root, items.clone()).run().await.unwrap();
        assert_eq!(first.files, vec!["src/content/docs/a/intro.md"]);
        assert_eq!(first.skipped.collision, 1);
        assert!(!root.path().join("src/content/docs/b/intro.md").exists());

        let second = runner(&root, items).run().await.unwrap();
        assert_eq!(second.files, first.files);
        assert_eq!(second.skipped.collision, 1);
        assert_eq!(second.unchanged, 1);
        assert!(second.stale.is_empty());
    }

    #[test]
    fn test_target_path_collapses_empty_slug_components() {
        let doc = ItemDocument {
            id: "1".into(),
            slug: "guides//setup".into(),
            title: "Setup".into(),
            description: String::new(),
            video: None,
            body: String::new(),
            segments: item::Segments {
                path: "docs".into(),
                subpath: String::new(),
            },
        };
        assert_eq!(
            target_path(Path::new("/site"), &doc),
            Path::new("/site/docs/guides/setup.md")
        );
    }

    #[tokio::test]
    async fn test_stale_files_are_reported_not_deleted() {
        let root = tempfile::tempdir().unwrap();
        let other = json!({ "id": "2", "fieldData": { "name": "Other" } });
        runner(&root, vec![getting_started(), other]).run().await.unwrap();

        let report = runner(&root, vec![getting_started()]).run().await.unwrap();
        assert_eq!(report.stale, vec!["src/content/docs/other.md"]);
        assert!(root.path().join("src/content/docs/other.md").exists());
    }

    #[tokio::test]
    async fn test_api_error_aborts_without_writing() {
        let root = tempfile::tempdir().unwrap();
        let source = FixedSource {
            items: vec![getting_started()],
            fail: true,
        };
        let err = SyncRunner::new(config_for(&root), source, "col")
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Webflow API error 500: boom");
        assert!(!config_for(&root).manifest_path().exists());
        assert!(!root.path().join("src/content/docs/getting-started.md").exists());
    }
}
