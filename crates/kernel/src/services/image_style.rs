//! Responsive image variants.
//!
//! Maps a (component type, field path) pair to a rendition config key, the
//! key to one rendition spec per breakpoint, and asks the asset service for a
//! URL per breakpoint. The table is built once at startup and only read
//! afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ResolveError};

/// Generic field path every component mapping may define as its fallback.
const GENERIC_FIELD: &str = "image";

/// Alt text used when the asset has no title.
const DEFAULT_ALT: &str = "Image";

/// Opaque handle to a stored raster asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub i64);

/// An image as known to the asset service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: ImageId,
    pub title: String,
}

/// Rendition descriptor understood by the asset service
/// (e.g. `fill-1200x800|format-webp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenditionSpec(pub String);

impl RenditionSpec {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Target box of the spec's resize operation, if it declares one.
    ///
    /// `fill-WxH` and `max-WxH` give both dimensions; `width-W` gives a width
    /// only (height 0).
    pub fn target_size(&self) -> Option<(u32, u32)> {
        self.0.split('|').find_map(|op| {
            let (name, arg) = op.split_once('-')?;
            match name {
                "fill" | "max" | "min" => {
                    let (w, h) = arg.split_once('x')?;
                    Some((w.parse().ok()?, h.parse().ok()?))
                }
                "width" => Some((arg.parse().ok()?, 0)),
                _ => None,
            }
        })
    }
}

impl fmt::Display for RenditionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Viewport class a rendition is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile];
}

/// One rendition spec per breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointSpecs {
    pub desktop: RenditionSpec,
    pub tablet: RenditionSpec,
    pub mobile: RenditionSpec,
}

impl BreakpointSpecs {
    fn new(desktop: &str, tablet: &str, mobile: &str) -> Self {
        Self {
            desktop: RenditionSpec(desktop.to_string()),
            tablet: RenditionSpec(tablet.to_string()),
            mobile: RenditionSpec(mobile.to_string()),
        }
    }

    pub fn get(&self, breakpoint: Breakpoint) -> &RenditionSpec {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop,
            Breakpoint::Tablet => &self.tablet,
            Breakpoint::Mobile => &self.mobile,
        }
    }

    /// Whether pixel area shrinks (or stays equal) from desktop to mobile.
    /// Specs without a parseable size are not checked.
    fn is_descending(&self) -> bool {
        let areas: Vec<u64> = Breakpoint::ALL
            .iter()
            .filter_map(|bp| self.get(*bp).target_size())
            .map(|(w, h)| u64::from(w) * u64::from(h.max(1)))
            .collect();
        areas.windows(2).all(|pair| pair[0] >= pair[1])
    }
}

fn content_image_specs() -> BreakpointSpecs {
    BreakpointSpecs::new(
        "fill-1200x800|format-webp",
        "fill-1000x700|format-webp",
        "fill-700x500|format-webp",
    )
}

/// Persisted shape of the table; validated into [`ImageVariantTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageVariantTableDef {
    pub default_component: String,
    pub default_config: String,
    pub configs: BTreeMap<String, BreakpointSpecs>,
    pub components: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ImageVariantTableDef {
    fn default() -> Self {
        let configs = BTreeMap::from([
            (
                "hero_background".to_string(),
                BreakpointSpecs::new(
                    "fill-2560x1440|format-webp",
                    "fill-1920x1080|format-webp",
                    "fill-1080x1920|format-webp",
                ),
            ),
            (
                "hero_slide".to_string(),
                BreakpointSpecs::new(
                    "fill-1200x480|format-webp",
                    "fill-1000x400|format-webp",
                    "fill-700x280|format-webp",
                ),
            ),
            (
                "hero_slide_full".to_string(),
                BreakpointSpecs::new(
                    "width-3840|format-webp",
                    "width-2048|format-webp",
                    "width-1080|format-webp",
                ),
            ),
            (
                "studio_section".to_string(),
                BreakpointSpecs::new(
                    "fill-1400x1200|format-webp",
                    "fill-1400x1000|format-webp",
                    "fill-1000x800|format-webp",
                ),
            ),
            (
                "media_comparator".to_string(),
                BreakpointSpecs::new(
                    "fill-1600x1200|format-webp",
                    "fill-1200x900|format-webp",
                    "fill-800x600|format-webp",
                ),
            ),
            ("content_image".to_string(), content_image_specs()),
            (
                "video_poster".to_string(),
                BreakpointSpecs::new(
                    "fill-3840x2160|format-webp",
                    "fill-2560x1440|format-webp",
                    "fill-1920x1080|format-webp",
                ),
            ),
        ]);

        let mapping = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
            pairs
                .iter()
                .map(|(field, key)| (field.to_string(), key.to_string()))
                .collect()
        };

        let components = BTreeMap::from([
            (
                "hero".to_string(),
                mapping(&[
                    ("background_image", "hero_background"),
                    ("slides.image", "hero_slide"),
                    ("slides.full_image", "hero_slide_full"),
                ]),
            ),
            (
                "multi_image_content".to_string(),
                mapping(&[("images.image", "studio_section")]),
            ),
            (
                "residential_projects".to_string(),
                mapping(&[("projects.image", "media_comparator")]),
            ),
            (
                "commercial_projects".to_string(),
                mapping(&[("projects.image", "media_comparator")]),
            ),
            (
                "horizontal_slider".to_string(),
                mapping(&[("slides.image", "media_comparator")]),
            ),
            (
                "video".to_string(),
                mapping(&[("poster_image", "video_poster")]),
            ),
            ("default".to_string(), mapping(&[("image", "content_image")])),
        ]);

        Self {
            default_component: "default".to_string(),
            default_config: "content_image".to_string(),
            configs,
            components,
        }
    }
}

/// Immutable component → field path → breakpoint spec table.
///
/// Construction guarantees the default config key exists, so every lookup
/// yields a full triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ImageVariantTableDef", into = "ImageVariantTableDef")]
pub struct ImageVariantTable {
    def: ImageVariantTableDef,
    fallback: BreakpointSpecs,
}

impl Default for ImageVariantTable {
    fn default() -> Self {
        Self {
            def: ImageVariantTableDef::default(),
            fallback: content_image_specs(),
        }
    }
}

impl TryFrom<ImageVariantTableDef> for ImageVariantTable {
    type Error = ConfigError;

    fn try_from(def: ImageVariantTableDef) -> Result<Self, Self::Error> {
        let fallback = def
            .configs
            .get(&def.default_config)
            .cloned()
            .ok_or_else(|| ConfigError::MissingDefaultConfig(def.default_config.clone()))?;

        for (key, specs) in &def.configs {
            if !specs.is_descending() {
                warn!(config = %key, "rendition sizes grow towards smaller breakpoints");
            }
        }
        for (component, fields) in &def.components {
            for (field, key) in fields {
                if !def.configs.contains_key(key) {
                    warn!(
                        component = %component,
                        field = %field,
                        config = %key,
                        "mapping names an undefined config, default will be used"
                    );
                }
            }
        }

        Ok(Self { def, fallback })
    }
}

impl From<ImageVariantTable> for ImageVariantTableDef {
    fn from(table: ImageVariantTable) -> Self {
        table.def
    }
}

impl ImageVariantTable {
    /// Config key for a field of a component.
    ///
    /// Unknown components use the default entry; a field path missing from
    /// the mapping uses the mapping's generic `image` key, then the global
    /// default key.
    pub fn config_key(&self, component_type: &str, field_path: &str) -> &str {
        let mapping = match self.def.components.get(component_type) {
            Some(mapping) => Some(mapping),
            None => {
                debug!(component = %component_type, "no image mapping, using default entry");
                self.def.components.get(&self.def.default_component)
            }
        };

        mapping
            .and_then(|m| m.get(field_path).or_else(|| m.get(GENERIC_FIELD)))
            .map(String::as_str)
            .unwrap_or(&self.def.default_config)
    }

    /// Breakpoint specs for a field of a component.
    pub fn specs(&self, component_type: &str, field_path: &str) -> &BreakpointSpecs {
        let key = self.config_key(component_type, field_path);
        self.def.configs.get(key).unwrap_or(&self.fallback)
    }
}

/// Asset storage collaborator. Owns images and their renditions.
pub trait AssetService {
    /// Look up an image by handle.
    fn image(&self, id: ImageId) -> Result<ImageAsset, ResolveError>;

    /// URL (absolute or site-relative) of the rendition of `image` for `spec`.
    fn rendition_url(&self, image: &ImageAsset, spec: &RenditionSpec) -> Result<String, ResolveError>;
}

/// Frontend image contract: one URL per breakpoint plus alt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsiveImage {
    pub src: String,
    pub desktop: String,
    pub tablet: String,
    pub mobile: String,
    pub alt: String,
}

/// Resolves image fields to [`ResponsiveImage`]s using a shared table.
#[derive(Debug, Clone, Copy)]
pub struct ImageVariantResolver<'a> {
    table: &'a ImageVariantTable,
    base_url: &'a str,
}

impl<'a> ImageVariantResolver<'a> {
    pub fn new(table: &'a ImageVariantTable, base_url: &'a str) -> Self {
        Self { table, base_url }
    }

    /// Produce the responsive variants of `image` for a component field.
    ///
    /// Calls the asset service once per breakpoint. `src` is the desktop URL.
    pub fn resolve(
        &self,
        component_type: &str,
        field_path: &str,
        image: &ImageAsset,
        assets: &dyn AssetService,
    ) -> Result<ResponsiveImage, ResolveError> {
        let specs = self.table.specs(component_type, field_path);

        let desktop = self.absolute(&assets.rendition_url(image, &specs.desktop)?);
        let tablet = self.absolute(&assets.rendition_url(image, &specs.tablet)?);
        let mobile = self.absolute(&assets.rendition_url(image, &specs.mobile)?);

        let alt = if image.title.trim().is_empty() {
            DEFAULT_ALT.to_string()
        } else {
            image.title.clone()
        };

        Ok(ResponsiveImage {
            src: desktop.clone(),
            desktop,
            tablet,
            mobile,
            alt,
        })
    }

    /// Look up the image by handle, then resolve it.
    pub fn resolve_id(
        &self,
        component_type: &str,
        field_path: &str,
        id: ImageId,
        assets: &dyn AssetService,
    ) -> Result<ResponsiveImage, ResolveError> {
        let image = assets.image(id)?;
        self.resolve(component_type, field_path, &image, assets)
    }

    fn absolute(&self, rendition_url: &str) -> String {
        if url::Url::parse(rendition_url).is_ok() {
            return rendition_url.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if rendition_url.starts_with('/') {
            format!("{base}{rendition_url}")
        } else {
            format!("{base}/{rendition_url}")
        }
    }
}
