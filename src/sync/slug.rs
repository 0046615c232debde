//! Slug normalization and the index of already-synced documents

use super::error::Result;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

struct SlugPatterns {
    disallowed: Regex,
    whitespace: Regex,
    hyphens: Regex,
    edge_slashes: Regex,
    edge_hyphen: Regex,
}

fn patterns() -> &'static SlugPatterns {
    static PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SlugPatterns {
        disallowed: Regex::new(r"[^a-z0-9\s/-]").expect("valid slug pattern"),
        whitespace: Regex::new(r"\s+").expect("valid slug pattern"),
        hyphens: Regex::new(r"-+").expect("valid slug pattern"),
        edge_slashes: Regex::new(r"^/+|/+$").expect("valid slug pattern"),
        edge_hyphen: Regex::new(r"^-|-$").expect("valid slug pattern"),
    })
}

/// Normalize text into a slug.
///
/// Lowercases, drops anything but `[a-z0-9]`, whitespace, `/` and `-`, turns
/// whitespace runs into single hyphens, then trims edge slashes and one edge
/// hyphen on each side. `/` survives so a slug can name a nested path.
pub fn to_slug(value: &str) -> String {
    let p = patterns();
    let lowered = value.to_lowercase();
    let slug = p.disallowed.replace_all(lowered.trim(), "");
    let slug = p.whitespace.replace_all(&slug, "-");
    let slug = p.hyphens.replace_all(&slug, "-");
    let slug = p.edge_slashes.replace_all(&slug, "");
    p.edge_hyphen.replace_all(&slug, "").into_owned()
}

/// Markdown documents already on disk, keyed by the slug of their file stem
#[derive(Debug, Default)]
pub struct SlugIndex {
    entries: HashMap<String, PathBuf>,
}

impl SlugIndex {
    /// Scan `docs_dir` recursively for `.md`/`.mdx` files, skipping `exclude`.
    ///
    /// Files are visited in file-name order; the first file for a slug wins.
    pub fn scan(docs_dir: &Path, exclude: &Path) -> Result<Self> {
        let mut index = Self::default();
        if !docs_dir.exists() {
            return Ok(index);
        }

        for entry in WalkDir::new(docs_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || entry.path() == exclude {
                continue;
            }
            let Some(stem) = markdown_stem(entry.path()) else {
                continue;
            };
            let slug = to_slug(stem);
            if slug.is_empty() {
                continue;
            }
            index
                .entries
                .entry(slug)
                .or_insert_with(|| entry.path().to_path_buf());
        }
        Ok(index)
    }

    pub fn get(&self, slug: &str) -> Option<&Path> {
        self.entries.get(slug).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File stem when the extension is `md` or `mdx` (any case)
fn markdown_stem(path: &Path) -> Option<&str> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx") {
        path.file_stem()?.to_str()
    } else {
        None
    }
}
