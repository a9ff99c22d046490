//! Blockwire test utilities.
//!
//! Helpers for integration testing: in-memory collaborators, persisted page
//! builders, and assertion utilities for serialized output.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Value as JsonValue, json};

use blockwire_kernel::error::ResolveError;
use blockwire_kernel::services::{
    AssetService, DocumentId, DocumentRef, ImageAsset, ImageId, PageId, PageRef,
    ReferenceResolver, RenditionSpec,
};

/// Create a persisted block record.
pub fn block(block_type: &str, id: &str, value: JsonValue) -> JsonValue {
    json!({ "type": block_type, "id": id, "value": value })
}

/// Wrap a list item the way the CMS stores list children.
pub fn list_item(value: JsonValue) -> JsonValue {
    json!({ "type": "item", "value": value })
}

/// Create a test page with default values.
pub fn test_page(title: &str) -> TestPage {
    TestPage {
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        hero_section: Vec::new(),
        body: Vec::new(),
    }
}

/// A persisted page builder.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub title: String,
    pub slug: String,
    pub hero_section: Vec<JsonValue>,
    pub body: Vec<JsonValue>,
}

impl TestPage {
    /// Set a custom slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    /// Set the hero block payload.
    pub fn with_hero(mut self, value: JsonValue) -> Self {
        self.hero_section = vec![block("hero", "hero", value)];
        self
    }

    /// Append a body block.
    pub fn with_block(mut self, block_type: &str, id: &str, value: JsonValue) -> Self {
        self.body.push(block(block_type, id, value));
        self
    }

    /// Append a raw body record.
    pub fn with_record(mut self, record: JsonValue) -> Self {
        self.body.push(record);
        self
    }

    /// Persisted JSON form.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "title": self.title,
            "slug": self.slug,
            "hero_section": self.hero_section,
            "body": self.body,
        })
    }
}

/// In-memory asset service.
///
/// Rendition URLs are site-relative:
/// `/media/images/{id}.{spec with '|' replaced by '.'}.webp`.
#[derive(Debug, Clone, Default)]
pub struct FakeAssets {
    titles: BTreeMap<i64, String>,
    broken_renditions: BTreeSet<i64>,
}

impl FakeAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image.
    pub fn with_image(mut self, id: i64, title: &str) -> Self {
        self.titles.insert(id, title.to_string());
        self
    }

    /// Register an image whose renditions cannot be produced.
    pub fn with_broken_image(mut self, id: i64) -> Self {
        self.titles.insert(id, format!("Broken {id}"));
        self.broken_renditions.insert(id);
        self
    }
}

impl AssetService for FakeAssets {
    fn image(&self, id: ImageId) -> Result<ImageAsset, ResolveError> {
        let title = self.titles.get(&id.0).ok_or(ResolveError::NotFound {
            kind: "image",
            id: id.0,
        })?;
        Ok(ImageAsset {
            id,
            title: title.clone(),
        })
    }

    fn rendition_url(
        &self,
        image: &ImageAsset,
        spec: &RenditionSpec,
    ) -> Result<String, ResolveError> {
        if self.broken_renditions.contains(&image.id.0) {
            return Err(ResolveError::Unavailable(format!(
                "rendition {spec} of image {} failed",
                image.id.0
            )));
        }
        Ok(format!(
            "/media/images/{}.{}.webp",
            image.id.0,
            spec.as_str().replace('|', ".")
        ))
    }
}

/// In-memory page tree and document store.
#[derive(Debug, Clone, Default)]
pub struct FakeReferences {
    pages: BTreeMap<i64, PageRef>,
    documents: BTreeMap<i64, DocumentRef>,
}

impl FakeReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live page.
    pub fn with_page(mut self, id: i64, title: &str, url: &str) -> Self {
        self.pages.insert(
            id,
            PageRef {
                id,
                title: title.to_string(),
                url: url.to_string(),
            },
        );
        self
    }

    /// Register a document.
    pub fn with_document(mut self, id: i64, url: &str, size: u64) -> Self {
        self.documents.insert(
            id,
            DocumentRef {
                url: url.to_string(),
                size,
            },
        );
        self
    }
}

impl ReferenceResolver for FakeReferences {
    fn page(&self, id: PageId) -> Result<PageRef, ResolveError> {
        self.pages.get(&id.0).cloned().ok_or(ResolveError::NotFound {
            kind: "page",
            id: id.0,
        })
    }

    fn document(&self, id: DocumentId) -> Result<DocumentRef, ResolveError> {
        self.documents
            .get(&id.0)
            .cloned()
            .ok_or(ResolveError::NotFound {
                kind: "document",
                id: id.0,
            })
    }
}

/// Assertion helpers for JSON output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert that a JSON value has a key holding `null`.
    pub fn null_key(value: &Value, key: &str) {
        has_key(value, key);
        assert!(
            value[key].is_null(),
            "Expected '{}' to be null, got: {}",
            key,
            value[key]
        );
    }

    /// Assert that a JSON value equals expected.
    pub fn json_eq(actual: &Value, expected: &Value) {
        assert_eq!(
            actual,
            expected,
            "JSON mismatch:\nactual: {}\nexpected: {}",
            actual,
            expected
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Pixel area encoded in a rendition URL (`fill-WxH` or `width-W`).
    pub fn rendition_area(url: &str) -> u64 {
        url.split(['/', '.'])
            .find_map(|part| {
                let (op, arg) = part.split_once('-')?;
                match op {
                    "fill" | "max" | "min" => {
                        let (w, h) = arg.split_once('x')?;
                        Some(w.parse::<u64>().ok()? * h.parse::<u64>().ok()?)
                    }
                    "width" => arg.parse::<u64>().ok(),
                    _ => None,
                }
            })
            .unwrap_or_else(|| panic!("no rendition size in '{url}'"))
    }
}
