//! Content tree serialization.
//!
//! This module provides:
//! - Fields: lenient access to loosely typed block payloads
//! - ContentNode: typed decoding of each known block tag
//! - LinkResolver: four-way link choice normalised to one link shape
//! - VideoKind: provider classification of video URLs
//! - PageSerializer: the pipeline from persisted tree to wire JSON

pub mod fields;
pub mod link;
pub mod node;
pub mod rich_text;
mod serialize;
pub mod video;
pub mod wire;

pub use fields::Fields;
pub use link::{DocumentDetail, LinkCandidates, LinkResolver, LinkTarget, ResolvedLink, SizeUnit};
pub use node::ContentNode;
pub use serialize::PageSerializer;
pub use video::{VideoKind, classify as classify_video};
pub use wire::{PageDocument, WireNode};
