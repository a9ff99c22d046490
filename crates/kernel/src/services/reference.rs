//! Page and document reference lookup.

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Handle to a page in the page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub i64);

/// Handle to an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub i64);

/// A resolved page: enough to link to it and label the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub id: i64,
    pub title: String,
    pub url: String,
}

/// A resolved document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub url: String,
    /// File size in bytes.
    pub size: u64,
}

/// Page-tree and document-store collaborator.
pub trait ReferenceResolver {
    fn page(&self, id: PageId) -> Result<PageRef, ResolveError>;

    fn document(&self, id: DocumentId) -> Result<DocumentRef, ResolveError>;
}
