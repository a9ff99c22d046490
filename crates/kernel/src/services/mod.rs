//! Collaborator-facing services.
//!
//! The serializer never stores or renders assets itself. These modules hold
//! the traits it calls through and the logic that sits directly on top of
//! them: responsive image variants, reference lookup and form mail.

pub mod email;
pub mod image_style;
pub mod reference;

pub use email::{
    AutoresponderSettings, FieldValue, FormMailSettings, FormSubmission, OutgoingMail,
    SubmittedField,
};
pub use image_style::{
    AssetService, Breakpoint, BreakpointSpecs, ImageAsset, ImageId, ImageVariantResolver,
    ImageVariantTable, ImageVariantTableDef, RenditionSpec, ResponsiveImage,
};
pub use reference::{DocumentId, DocumentRef, PageId, PageRef, ReferenceResolver};
