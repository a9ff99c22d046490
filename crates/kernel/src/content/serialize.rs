//! Page serialization pipeline.
//!
//! Walks the persisted block tree in authored order, decodes each record into
//! a [`ContentNode`], resolves links, images and videos through the injected
//! collaborators, and emits the wire JSON. Failures stay local: a field that
//! cannot be resolved becomes `null` or its default, and a block that cannot
//! be serialized at all is forwarded as stored.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::fields::Fields;
use super::link::{LinkCandidates, LinkResolver, ResolvedLink};
use super::node::{self, ButtonLink, ContentNode};
use super::wire;
use crate::config::SerializerConfig;
use crate::error::{NodeError, SerializeError};
use crate::services::{
    AssetService, ImageId, ImageVariantResolver, PageId, PageRef, ReferenceResolver,
    ResponsiveImage,
};

/// Tag used for records that carry no type tag.
const UNTAGGED: &str = "unknown";

/// Request-scoped serializer over one configuration and two collaborators.
///
/// Holds no mutable state; serializing the same tree twice yields identical
/// output.
#[derive(Clone, Copy)]
pub struct PageSerializer<'a> {
    links: LinkResolver<'a>,
    images: ImageVariantResolver<'a>,
    assets: &'a dyn AssetService,
    references: &'a dyn ReferenceResolver,
}

impl<'a> PageSerializer<'a> {
    pub fn new(
        config: &'a SerializerConfig,
        assets: &'a dyn AssetService,
        references: &'a dyn ReferenceResolver,
    ) -> Self {
        Self {
            links: LinkResolver::new(&config.link_placeholder),
            images: ImageVariantResolver::new(&config.images, &config.base_url),
            assets,
            references,
        }
    }

    /// Serialize a persisted page `{title, slug, hero_section, body}`.
    ///
    /// Fails only when the root is not a mapping or one of its block streams
    /// is not a list.
    pub fn serialize_page(&self, page: &Value) -> Result<wire::PageDocument, SerializeError> {
        let root = Fields::of(page)
            .ok_or_else(|| SerializeError::MalformedTree("page is not a mapping".to_string()))?;

        let hero_section = stream(&root, "hero_section")?;
        let body = stream(&root, "body")?;

        let hero = hero_section
            .iter()
            .find(|record| record.get("type").and_then(Value::as_str) == Some("hero"))
            .and_then(|record| record.get("value"))
            .and_then(|value| match ContentNode::decode("hero", value) {
                Ok(ContentNode::Hero(hero)) => Some(self.hero(&hero)),
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, "hero section is malformed, omitting it");
                    None
                }
            });

        Ok(wire::PageDocument {
            title: root.text_or("title", ""),
            slug: root.text_or("slug", ""),
            hero,
            body: self.serialize(body),
        })
    }

    /// Serialize a block stream. One output record per input record, in
    /// the same order.
    pub fn serialize(&self, records: &[Value]) -> Vec<wire::WireNode> {
        records
            .iter()
            .enumerate()
            .map(|(position, record)| self.serialize_record(position, record))
            .collect()
    }

    fn serialize_record(&self, position: usize, record: &Value) -> wire::WireNode {
        let fields = Fields::new(record);
        let block_type = fields.text("type").unwrap_or(UNTAGGED).to_string();
        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => format!("{block_type}_{id}"),
            Some(Value::Number(id)) => format!("{block_type}_{id}"),
            _ => format!("{block_type}_{position}"),
        };
        let raw = fields.get("value").unwrap_or(&Value::Null);

        let value = match self.node_value(&block_type, raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(block_type = %block_type, id = %id, error = %e, "forwarding block as stored");
                raw.clone()
            }
        };

        wire::WireNode {
            block_type,
            id,
            value,
        }
    }

    fn node_value(&self, block_type: &str, raw: &Value) -> Result<Value, NodeError> {
        let node = ContentNode::decode(block_type, raw)?;
        let value = match node {
            ContentNode::Unknown(raw) => {
                debug!(block_type = %block_type, "unrecognised block type, passing through");
                raw.clone()
            }
            ContentNode::Hero(hero) => to_value(self.hero(&hero))?,
            ContentNode::Projects(block) => to_value(wire::Projects {
                title: block.title,
                subtitle: block.subtitle,
                projects: self.grid_items(block_type, "projects.image", &block.projects),
            })?,
            ContentNode::HorizontalSlider(block) => to_value(wire::HorizontalSlider {
                title: block.title,
                description: block.description,
                slides: self.grid_items(block_type, "slides.image", &block.slides),
                autoplay_enabled: block.autoplay_enabled,
                autoplay_delay: block.autoplay_delay,
            })?,
            ContentNode::MultiImageContent(block) => to_value(self.multi_image(block_type, block))?,
            ContentNode::Gallery(block) => to_value(wire::Gallery {
                title: block.title,
                items: block
                    .items
                    .into_iter()
                    .map(|item| wire::GalleryItem {
                        image: self.image(block_type, "items.image", item.image),
                        caption: item.caption,
                    })
                    .collect(),
            })?,
            ContentNode::CardGrid(block) => to_value(wire::CardGrid {
                title: block.title,
                button: block.button.map(|b| self.themed_button(b)),
                items: block
                    .items
                    .into_iter()
                    .map(|card| {
                        let (video_url, video_type) = card.video.unzip();
                        wire::Card {
                            title: card.title,
                            text: card.text,
                            image: self.image(block_type, "items.image", card.image),
                            video_url,
                            video_type,
                            link: self.link(&card.link),
                        }
                    })
                    .collect(),
            })?,
            ContentNode::RichText(block) => to_value(wire::RichText {
                paragraphs: block.paragraphs,
                css_class: block.css_class,
            })?,
            ContentNode::Lead(block) => to_value(wire::Lead {
                text: block.text,
                css_class: block.css_class,
            })?,
            ContentNode::Quote(block) => to_value(wire::Quote {
                avatar: self.image(block_type, "avatar", block.avatar),
                quote: block.quote,
                title: block.title,
                author: block.author,
                position: block.position,
            })?,
            ContentNode::Image(block) => to_value(wire::Image {
                image: self.image(block_type, "image", block.image),
                caption: block.caption,
            })?,
            ContentNode::Button(block) => to_value(self.themed_button(block))?,
            ContentNode::MultipleButtons(buttons) => to_value(wire::MultipleButtons {
                buttons: buttons.into_iter().map(|b| self.themed_button(b)).collect(),
            })?,
            ContentNode::Video(block) => to_value(wire::Video {
                poster: self.image(block_type, "poster_image", block.poster),
                video_url: block.url,
                video_type: block.kind,
                autoplay: block.autoplay,
            })?,
            ContentNode::Accordion(items) => to_value(wire::Accordion {
                items: items
                    .into_iter()
                    .map(|item| wire::AccordionItem {
                        title: item.title,
                        content: self.serialize(item.content),
                    })
                    .collect(),
            })?,
            ContentNode::Space { height } => to_value(wire::Space { height })?,
            ContentNode::Divider => Value::Object(Map::new()),
            ContentNode::Listing(block) => to_value(wire::Listing {
                title: block.title,
                limit: block.limit,
                button: block.button.map(|b| self.themed_button(b)),
                landing_page: self.page_summary(block.landing_page),
            })?,
        };
        Ok(value)
    }

    fn hero(&self, hero: &node::HeroBlock) -> wire::Hero {
        let background = match &hero.background {
            node::HeroBackground::Video { url, kind } => wire::HeroBackground {
                video_url: Some(url.clone()),
                video_type: Some(*kind),
                image: None,
            },
            node::HeroBackground::Image(image) => wire::HeroBackground {
                image: self.image("hero", "background_image", Some(*image)),
                ..Default::default()
            },
            node::HeroBackground::None => wire::HeroBackground::default(),
        };

        let slides = hero
            .slides
            .iter()
            .enumerate()
            .map(|(position, slide)| wire::HeroSlide {
                id: position + 1,
                title: slide.title.clone(),
                description: slide.description.clone(),
                button: self.button(&slide.button),
                image: self.image("hero", "slides.image", slide.image),
                full_image: self.image("hero", "slides.full_image", slide.full_image),
            })
            .collect();

        wire::Hero {
            title: hero.title.clone(),
            cta: wire::HeroCta {
                text: hero.cta_text.clone(),
                link: hero.cta_link.clone(),
            },
            background,
            slides,
            settings: wire::AutoplaySettings {
                autoplay_enabled: hero.autoplay_enabled,
                autoplay_delay: hero.autoplay_delay,
            },
        }
    }

    fn grid_items(
        &self,
        component_type: &str,
        image_field: &str,
        items: &[node::GridItem],
    ) -> Vec<wire::GridItem> {
        items
            .iter()
            .map(|item| wire::GridItem {
                order: item.order.clone(),
                title: item.title.clone(),
                description: item.description.clone(),
                button: self.button(&item.button),
                page_link: self.page_summary(item.page),
                image: self.image(component_type, image_field, item.image),
            })
            .collect()
    }

    fn multi_image(&self, block_type: &str, block: node::MultiImageBlock) -> wire::MultiImageContent {
        let images = block
            .images
            .iter()
            .filter_map(|studio| {
                let mut image = self.image(block_type, "images.image", Some(studio.image))?;
                if let Some(alt) = &studio.alt {
                    image.alt = alt.clone();
                }
                Some(image)
            })
            .collect();

        wire::MultiImageContent {
            title: block.title,
            subtitle: block.subtitle,
            description: block.description,
            images,
            cta: block.cta.map(|cta| wire::Cta {
                button: self.button(&cta.button),
                page_link: self.page_summary(cta.page),
            }),
        }
    }

    fn button(&self, button: &ButtonLink) -> wire::Button {
        wire::Button {
            text: button.text.clone(),
            link: self.link(&button.link),
        }
    }

    fn themed_button(&self, button: node::ButtonBlock) -> wire::ThemedButton {
        wire::ThemedButton {
            link: self.link(&button.link),
            text: button.text,
            theme: button.theme,
        }
    }

    fn link(&self, candidates: &LinkCandidates) -> ResolvedLink {
        self.links.resolve(candidates, self.references)
    }

    fn page_summary(&self, page: Option<PageId>) -> Option<PageRef> {
        self.links.page_summary(page, self.references)
    }

    /// Responsive variants for an image field, or `None` when unset or when
    /// the asset service cannot produce them.
    fn image(
        &self,
        component_type: &str,
        field_path: &str,
        image: Option<ImageId>,
    ) -> Option<ResponsiveImage> {
        let id = image?;
        match self
            .images
            .resolve_id(component_type, field_path, id, self.assets)
        {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(
                    component = %component_type,
                    field = %field_path,
                    image = id.0,
                    error = %e,
                    "image did not resolve"
                );
                None
            }
        }
    }
}

/// Block stream of the page root; missing or null means empty.
fn stream<'a>(root: &Fields<'a>, key: &str) -> Result<&'a [Value], SerializeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(SerializeError::MalformedTree(format!(
            "'{key}' is not a list of blocks"
        ))),
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, NodeError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::services::{DocumentId, DocumentRef, ImageAsset, RenditionSpec};
    use serde_json::json;

    struct Assets;

    impl AssetService for Assets {
        fn image(&self, id: ImageId) -> Result<ImageAsset, ResolveError> {
            match id.0 {
                666 => Err(ResolveError::NotFound { kind: "image", id: id.0 }),
                _ => Ok(ImageAsset {
                    id,
                    title: format!("Image {}", id.0),
                }),
            }
        }

        fn rendition_url(
            &self,
            image: &ImageAsset,
            spec: &RenditionSpec,
        ) -> Result<String, ResolveError> {
            Ok(format!("/media/{}/{}", image.id.0, spec.as_str()))
        }
    }

    struct Refs;

    impl ReferenceResolver for Refs {
        fn page(&self, id: PageId) -> Result<PageRef, ResolveError> {
            Ok(PageRef {
                id: id.0,
                title: format!("Page {}", id.0),
                url: format!("/page-{}/", id.0),
            })
        }

        fn document(&self, id: DocumentId) -> Result<DocumentRef, ResolveError> {
            Err(ResolveError::NotFound { kind: "document", id: id.0 })
        }
    }

    fn serializer(config: &SerializerConfig) -> PageSerializer<'_> {
        PageSerializer::new(config, &Assets, &Refs)
    }

    #[test]
    fn order_is_preserved_and_duplicates_kept() {
        let config = SerializerConfig::default();
        let records = vec![
            json!({ "type": "divider", "id": "a", "value": {} }),
            json!({ "type": "space", "id": "b", "value": { "height": 10 } }),
            json!({ "type": "divider", "id": "a", "value": {} }),
        ];
        let out = serializer(&config).serialize(&records);
        let ids: Vec<_> = out.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["divider_a", "space_b", "divider_a"]);
    }

    #[test]
    fn ids_fall_back_to_position() {
        let config = SerializerConfig::default();
        let records = vec![
            json!({ "type": "divider", "value": {} }),
            json!({ "type": "space", "id": 42, "value": {} }),
            json!({ "value": { "x": 1 } }),
        ];
        let out = serializer(&config).serialize(&records);
        assert_eq!(out[0].id, "divider_0");
        assert_eq!(out[1].id, "space_42");
        assert_eq!(out[2].block_type, "unknown");
        assert_eq!(out[2].value, json!({ "x": 1 }));
    }

    #[test]
    fn malformed_known_block_is_forwarded() {
        let config = SerializerConfig::default();
        let records = vec![
            json!({ "type": "horizontal_slider", "id": "s", "value": "oops" }),
            json!({ "type": "space", "id": "t", "value": { "height": "12" } }),
        ];
        let out = serializer(&config).serialize(&records);
        assert_eq!(out[0].value, json!("oops"));
        assert_eq!(out[1].value, json!({ "height": 12 }));
    }

    #[test]
    fn grid_item_without_image_has_null_image_key() {
        let config = SerializerConfig::default();
        let records = vec![json!({
            "type": "residential_projects",
            "id": "p",
            "value": { "title": "Homes", "projects": [{ "title": "No picture" }] }
        })];
        let out = serializer(&config).serialize(&records);
        let project = &out[0].value["projects"][0];
        assert!(project.as_object().unwrap().contains_key("image"));
        assert!(project["image"].is_null());
        assert!(project["page_link"].is_null());
        assert_eq!(project["button"]["text"], "Learn More");
        assert_eq!(project["button"]["url"], "#");
    }

    #[test]
    fn failing_image_degrades_only_that_field() {
        let config = SerializerConfig::default();
        let records = vec![json!({
            "type": "slider_gallery",
            "id": "g",
            "value": { "items": [{ "image": 666, "caption": "gone" }, { "image": 1, "caption": "ok" }] }
        })];
        let out = serializer(&config).serialize(&records);
        let items = &out[0].value["items"];
        assert!(items[0]["image"].is_null());
        assert_eq!(items[0]["caption"], "gone");
        assert_eq!(
            items[1]["image"]["desktop"],
            "http://127.0.0.1:8000/media/1/fill-1200x800|format-webp"
        );
    }

    #[test]
    fn hero_background_video_only() {
        let config = SerializerConfig::default();
        let hero = node::HeroBlock {
            title: "T".to_string(),
            cta_text: "C".to_string(),
            cta_link: "#c".to_string(),
            background: node::HeroBackground::Video {
                url: "https://cdn.example.com/loop.mp4".to_string(),
                kind: crate::content::VideoKind::Html5,
            },
            slides: vec![],
            autoplay_enabled: false,
            autoplay_delay: 100,
        };
        let value = serde_json::to_value(serializer(&config).hero(&hero)).unwrap();
        assert_eq!(
            value["background"],
            json!({ "video_url": "https://cdn.example.com/loop.mp4", "video_type": "html5" })
        );
    }

    #[test]
    fn document_failure_gives_inert_link() {
        let config = SerializerConfig::default();
        let records = vec![json!({
            "type": "button",
            "id": "b",
            "value": { "text": "Brochure", "href": { "document_link": 9 } }
        })];
        let out = serializer(&config).serialize(&records);
        assert_eq!(
            out[0].value,
            json!({ "text": "Brochure", "theme": null, "link": { "url": "#", "opens_new_tab": false } })
        );
    }

    #[test]
    fn accordion_serializes_nested_stream() {
        let config = SerializerConfig::default();
        let records = vec![json!({
            "type": "accordion",
            "id": "acc",
            "value": {
                "items": [{
                    "title": "FAQ",
                    "content_blocks": [
                        { "type": "content", "id": "c1", "value": { "content": "<p>Yes</p>" } },
                        { "type": "html", "id": "h1", "value": { "source": "<b>raw</b>" } }
                    ]
                }]
            }
        })];
        let out = serializer(&config).serialize(&records);
        let content = &out[0].value["items"][0]["content"];
        assert_eq!(content[0]["value"]["paragraphs"], json!(["Yes"]));
        assert_eq!(content[1]["value"], json!({ "source": "<b>raw</b>" }));
    }

    #[test]
    fn root_must_be_a_page() {
        let config = SerializerConfig::default();
        let s = serializer(&config);
        assert!(s.serialize_page(&json!([1, 2])).is_err());
        assert!(s.serialize_page(&json!({ "body": "nope" })).is_err());
        let empty = s.serialize_page(&json!({})).unwrap();
        assert!(empty.hero.is_none());
        assert!(empty.body.is_empty());
    }
}
