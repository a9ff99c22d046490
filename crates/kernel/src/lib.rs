//! Blockwire kernel library.
//!
//! Turns a page's persisted block tree into the JSON document a decoupled
//! frontend renders. Asset storage and the page tree stay behind the
//! [`AssetService`] and [`ReferenceResolver`] traits; the host application
//! supplies both plus a [`SerializerConfig`].

pub mod config;
pub mod content;
pub mod error;
pub mod services;

pub use config::SerializerConfig;
pub use content::{PageDocument, PageSerializer, WireNode};
pub use error::{ConfigError, ResolveError, SerializeError};
pub use services::{AssetService, ReferenceResolver};
