//! Link target resolution.
//!
//! Authors pick one of four link kinds (internal page, external URL, document,
//! free text). Older records only carry a single free-text `link`. Everything
//! is normalised to [`ResolvedLink`]: `{url, opens_new_tab, detail?}`.

use serde::Serialize;
use tracing::{debug, warn};

use super::fields::Fields;
use crate::services::{DocumentId, PageId, PageRef, ReferenceResolver};

/// Bytes per unit step.
const UNIT_STEP: f64 = 1024.0;

/// Link candidates as authored. More than one may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCandidates {
    pub page: Option<PageId>,
    pub external: Option<String>,
    pub document: Option<DocumentId>,
    pub freeform: Option<String>,
    /// Historical single free-text link from before the four-way choice.
    pub legacy: Option<String>,
}

/// The one link kind that wins among the candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    InternalPage(PageId),
    ExternalUrl(String),
    DocumentFile(DocumentId),
    FreeformText(String),
    Legacy(String),
    None,
}

impl LinkCandidates {
    /// Candidates from an href-style mapping (`page_link`, `external_link`,
    /// `document_link`, `free_link`, legacy `link`).
    pub fn from_href(fields: &Fields<'_>) -> Self {
        Self {
            page: fields.page("page_link"),
            external: fields.text("external_link").map(str::to_string),
            document: fields.document("document_link"),
            freeform: fields.text("free_link").map(str::to_string),
            legacy: fields.text("link").map(str::to_string),
        }
    }

    /// Candidates from a button-style mapping, where `is_external_link`
    /// selects between `external_url` and `page_link`. A legacy `link` is
    /// used only when the selected kind is empty.
    pub fn from_button(fields: &Fields<'_>) -> Self {
        let legacy = fields.text("link").map(str::to_string);
        if fields.flag("is_external_link", false) {
            Self {
                external: fields.text("external_url").map(str::to_string),
                legacy,
                ..Self::default()
            }
        } else {
            Self {
                page: fields.page("page_link"),
                legacy,
                ..Self::default()
            }
        }
    }

    /// Pick the winning kind: page > external > document > freeform, and the
    /// legacy field only when none of the four is set.
    pub fn target(&self) -> LinkTarget {
        if let Some(page) = self.page {
            LinkTarget::InternalPage(page)
        } else if let Some(url) = &self.external {
            LinkTarget::ExternalUrl(url.clone())
        } else if let Some(document) = self.document {
            LinkTarget::DocumentFile(document)
        } else if let Some(text) = &self.freeform {
            LinkTarget::FreeformText(text.clone())
        } else if let Some(text) = &self.legacy {
            LinkTarget::Legacy(text.clone())
        } else {
            LinkTarget::None
        }
    }
}

/// Size unit of a document. Capped at GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeUnit {
    #[serde(rename = "KB")]
    Kb,
    #[serde(rename = "MB")]
    Mb,
    #[serde(rename = "GB")]
    Gb,
}

impl SizeUnit {
    fn next(self) -> Option<Self> {
        match self {
            SizeUnit::Kb => Some(SizeUnit::Mb),
            SizeUnit::Mb => Some(SizeUnit::Gb),
            SizeUnit::Gb => None,
        }
    }
}

/// Human-readable document size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentDetail {
    pub size: f64,
    #[serde(rename = "type")]
    pub unit: SizeUnit,
}

impl DocumentDetail {
    /// Convert a byte count to KB, stepping up to MB and GB while the value
    /// is at least one unit of the next tier. Values beyond that stay in GB.
    pub fn from_bytes(bytes: u64) -> Self {
        let mut size = bytes as f64 / UNIT_STEP;
        let mut unit = SizeUnit::Kb;
        while size >= UNIT_STEP {
            let Some(next) = unit.next() else { break };
            size /= UNIT_STEP;
            unit = next;
        }
        Self { size, unit }
    }
}

/// Frontend link contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLink {
    pub url: String,
    pub opens_new_tab: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DocumentDetail>,
}

impl ResolvedLink {
    fn new(url: String, opens_new_tab: bool) -> Self {
        Self {
            url,
            opens_new_tab,
            detail: None,
        }
    }
}

/// Resolves [`LinkCandidates`] against the page tree and document store.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    placeholder: &'a str,
}

impl<'a> LinkResolver<'a> {
    /// `placeholder` is the URL of the inert no-op link.
    pub fn new(placeholder: &'a str) -> Self {
        Self { placeholder }
    }

    /// Link that goes nowhere.
    pub fn inert(&self) -> ResolvedLink {
        ResolvedLink::new(self.placeholder.to_string(), false)
    }

    pub fn resolve(
        &self,
        candidates: &LinkCandidates,
        references: &dyn ReferenceResolver,
    ) -> ResolvedLink {
        match candidates.target() {
            LinkTarget::InternalPage(id) => match references.page(id) {
                Ok(page) => ResolvedLink::new(page.url, false),
                Err(e) => {
                    warn!(page = id.0, error = %e, "link page did not resolve");
                    self.inert()
                }
            },
            LinkTarget::ExternalUrl(url) => ResolvedLink::new(url, true),
            LinkTarget::DocumentFile(id) => match references.document(id) {
                Ok(document) => ResolvedLink {
                    url: document.url,
                    opens_new_tab: true,
                    detail: Some(DocumentDetail::from_bytes(document.size)),
                },
                Err(e) => {
                    warn!(document = id.0, error = %e, "link document did not resolve");
                    self.inert()
                }
            },
            LinkTarget::FreeformText(text) => ResolvedLink::new(text, false),
            // Pre-choice records were treated as external links.
            LinkTarget::Legacy(text) => ResolvedLink::new(text, true),
            LinkTarget::None => {
                debug!("no link candidate set");
                self.inert()
            }
        }
    }

    /// Summary of a linked page, or `None` when unset or unresolvable.
    pub fn page_summary(
        &self,
        page: Option<PageId>,
        references: &dyn ReferenceResolver,
    ) -> Option<PageRef> {
        let id = page?;
        references
            .page(id)
            .inspect_err(|e| warn!(page = id.0, error = %e, "page summary did not resolve"))
            .ok()
    }
}
