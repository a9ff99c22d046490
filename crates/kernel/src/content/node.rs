//! Content nodes decoded from persisted block records.
//!
//! Each block tag maps to one variant with a typed payload. Payloads are
//! built once per request from the loosely typed stored mapping; derived
//! values (winning link kind, rich-text paragraphs, slide full-size image,
//! video kind) are computed here so serialization only has to resolve
//! references. Unrecognised tags are kept as [`ContentNode::Unknown`].

use serde_json::Value;

use super::fields::Fields;
use super::link::LinkCandidates;
use super::rich_text;
use super::video::{self, VideoKind};
use crate::error::NodeError;
use crate::services::{ImageId, PageId};

const DEFAULT_HERO_TITLE: &str = "Transform your<br/>outdoor dreams";
const DEFAULT_HERO_CTA_TEXT: &str = "Get a Free Site Visit";
const DEFAULT_HERO_CTA_LINK: &str = "#contact";
const DEFAULT_HERO_AUTOPLAY_DELAY: i64 = 5000;
const DEFAULT_SLIDE_BUTTON_TEXT: &str = "Read more";
const DEFAULT_GRID_BUTTON_TEXT: &str = "Learn More";
const DEFAULT_CTA_BUTTON_TEXT: &str = "Get Started";
const DEFAULT_SLIDER_AUTOPLAY_DELAY: i64 = 3000;
const DEFAULT_SLIDE_ORDER: &str = "1";
const DEFAULT_STUDIO_TITLE: &str = "Bring your dream home to life";
const DEFAULT_SPACE_HEIGHT: i64 = 50;
const DEFAULT_LATEST_LIMIT: i64 = 3;
const DEFAULT_CHILD_PAGES_LIMIT: i64 = 10;

/// A decoded content block.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode<'a> {
    Hero(HeroBlock),
    Projects(ProjectsBlock),
    HorizontalSlider(SliderBlock),
    MultiImageContent(MultiImageBlock),
    Gallery(GalleryBlock),
    CardGrid(CardGridBlock),
    RichText(RichTextBlock),
    Lead(LeadBlock),
    Quote(QuoteBlock),
    Image(ImageBlock),
    Button(ButtonBlock),
    MultipleButtons(Vec<ButtonBlock>),
    Video(VideoBlock),
    Accordion(Vec<AccordionItem<'a>>),
    Space { height: i64 },
    Divider,
    Listing(ListingBlock),
    /// Forwarded as stored.
    Unknown(&'a Value),
}

/// A button label plus its link candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLink {
    pub text: String,
    pub link: LinkCandidates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroBackground {
    Video { url: String, kind: VideoKind },
    Image(ImageId),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroBlock {
    pub title: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background: HeroBackground,
    pub slides: Vec<HeroSlide>,
    pub autoplay_enabled: bool,
    pub autoplay_delay: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSlide {
    pub title: String,
    pub description: String,
    pub button: ButtonLink,
    pub image: Option<ImageId>,
    /// Dedicated high-resolution asset, else the main image.
    pub full_image: Option<ImageId>,
}

/// One card of a project grid or horizontal slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    pub order: Option<String>,
    pub title: String,
    pub description: String,
    pub button: ButtonLink,
    pub page: Option<PageId>,
    pub image: Option<ImageId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectsBlock {
    pub title: String,
    pub subtitle: String,
    pub projects: Vec<GridItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderBlock {
    pub title: String,
    pub description: String,
    pub slides: Vec<GridItem>,
    pub autoplay_enabled: bool,
    pub autoplay_delay: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioImage {
    pub image: ImageId,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaBlock {
    pub button: ButtonLink,
    pub page: Option<PageId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiImageBlock {
    pub title: String,
    pub subtitle: String,
    pub description: Vec<String>,
    pub images: Vec<StudioImage>,
    pub cta: Option<CtaBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub image: Option<ImageId>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryBlock {
    pub title: String,
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub text: String,
    pub image: Option<ImageId>,
    pub video: Option<(String, VideoKind)>,
    pub link: LinkCandidates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardGridBlock {
    pub title: String,
    pub button: Option<ButtonBlock>,
    pub items: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextBlock {
    pub paragraphs: Vec<String>,
    pub css_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadBlock {
    pub text: String,
    pub css_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteBlock {
    pub quote: String,
    pub title: Option<String>,
    pub author: String,
    pub position: String,
    pub avatar: Option<ImageId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    pub image: Option<ImageId>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBlock {
    pub text: String,
    pub theme: Option<String>,
    pub link: LinkCandidates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBlock {
    pub url: String,
    pub kind: VideoKind,
    pub poster: Option<ImageId>,
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccordionItem<'a> {
    pub title: String,
    /// Nested block records, serialized through the same pipeline.
    pub content: &'a [Value],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingBlock {
    pub title: String,
    pub limit: i64,
    pub button: Option<ButtonBlock>,
    pub landing_page: Option<PageId>,
}

impl<'a> ContentNode<'a> {
    /// Decode the payload of a block with the given tag.
    ///
    /// Unknown tags never fail. Known tags fail only when the payload is not
    /// a mapping at all; individual fields fall back to their defaults.
    pub(crate) fn decode(block_type: &str, value: &'a Value) -> Result<Self, NodeError> {
        let node = match block_type {
            "hero" => ContentNode::Hero(HeroBlock::decode(&mapping(block_type, value)?)),
            "residential_projects" | "commercial_projects" => {
                ContentNode::Projects(ProjectsBlock::decode(&mapping(block_type, value)?))
            }
            "horizontal_slider" => {
                ContentNode::HorizontalSlider(SliderBlock::decode(&mapping(block_type, value)?))
            }
            "multi_image_content" => {
                ContentNode::MultiImageContent(MultiImageBlock::decode(&mapping(block_type, value)?))
            }
            "slider_gallery" | "gallery" => {
                ContentNode::Gallery(GalleryBlock::decode(&mapping(block_type, value)?))
            }
            "card_grid" => ContentNode::CardGrid(CardGridBlock::decode(&mapping(block_type, value)?)),
            "heading" | "paragraph" | "content" => {
                ContentNode::RichText(RichTextBlock::decode(block_type, value))
            }
            "lead" => {
                let f = mapping(block_type, value)?;
                ContentNode::Lead(LeadBlock {
                    text: f.text_or("content", ""),
                    css_class: f.text_or("css_class", ""),
                })
            }
            "quote" | "quote_with_author" => ContentNode::Quote(QuoteBlock::decode(value)),
            "image" | "fullwidth_image" => {
                let f = mapping(block_type, value)?;
                ContentNode::Image(ImageBlock {
                    image: f.image("image"),
                    caption: f.text_or("caption", ""),
                })
            }
            "button" | "simple_button" => {
                ContentNode::Button(ButtonBlock::decode(&mapping(block_type, value)?))
            }
            "multiple_button" => {
                let f = mapping(block_type, value)?;
                ContentNode::MultipleButtons(
                    f.items("buttons")
                        .iter()
                        .map(|item| ButtonBlock::decode(&item.object("button").unwrap_or(*item)))
                        .collect(),
                )
            }
            "video" => ContentNode::Video(VideoBlock::decode(&mapping(block_type, value)?)),
            "accordion" => {
                let f = mapping(block_type, value)?;
                ContentNode::Accordion(
                    f.items("items")
                        .iter()
                        .map(|item| AccordionItem {
                            title: item.text_or("title", ""),
                            content: item.list("content_blocks"),
                        })
                        .collect(),
                )
            }
            "space" => ContentNode::Space {
                height: Fields::new(value).int_or("height", DEFAULT_SPACE_HEIGHT),
            },
            "divider" => ContentNode::Divider,
            "latest_news" | "latest_blog" => {
                ContentNode::Listing(ListingBlock::decode(&mapping(block_type, value)?, DEFAULT_LATEST_LIMIT))
            }
            "explore_more_grid" => ContentNode::Listing(ListingBlock::decode(
                &mapping(block_type, value)?,
                DEFAULT_CHILD_PAGES_LIMIT,
            )),
            _ => ContentNode::Unknown(value),
        };
        Ok(node)
    }
}

fn mapping<'a>(block_type: &str, value: &'a Value) -> Result<Fields<'a>, NodeError> {
    Fields::of(value).ok_or_else(|| NodeError::MalformedPayload(block_type.to_string()))
}

impl ButtonLink {
    fn decode(fields: &Fields<'_>, text_key: &str, default_text: &str) -> Self {
        Self {
            text: fields.text_or(text_key, default_text),
            link: LinkCandidates::from_button(fields),
        }
    }
}

impl HeroBlock {
    fn decode(f: &Fields<'_>) -> Self {
        // Video wins whenever it is a non-empty string, even if blank or invalid.
        let video = f
            .get("background_video")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty());
        let background = match (video, f.image("background_image")) {
            (Some(url), _) => HeroBackground::Video {
                url: url.to_string(),
                kind: video::classify(url),
            },
            (None, Some(image)) => HeroBackground::Image(image),
            (None, None) => HeroBackground::None,
        };

        let slides = f
            .items("slides")
            .iter()
            .map(|slide| {
                let image = slide.image("image");
                HeroSlide {
                    title: slide.text_or("title", ""),
                    description: slide.text_or("description", ""),
                    button: ButtonLink::decode(slide, "button_text", DEFAULT_SLIDE_BUTTON_TEXT),
                    image,
                    full_image: slide.image("full_image").or(image),
                }
            })
            .collect();

        Self {
            title: f.text_or("hero_title", DEFAULT_HERO_TITLE),
            cta_text: f.text_or("cta_text", DEFAULT_HERO_CTA_TEXT),
            cta_link: f.text_or("cta_link", DEFAULT_HERO_CTA_LINK),
            background,
            slides,
            autoplay_enabled: f.flag("autoplay_enabled", true),
            autoplay_delay: f.int_or("autoplay_delay", DEFAULT_HERO_AUTOPLAY_DELAY),
        }
    }
}

impl GridItem {
    fn decode(f: &Fields<'_>, with_order: bool) -> Self {
        Self {
            order: with_order.then(|| f.text_or("order", DEFAULT_SLIDE_ORDER)),
            title: f.text_or("title", ""),
            description: f.text_or("description", ""),
            button: ButtonLink::decode(f, "button_text", DEFAULT_GRID_BUTTON_TEXT),
            page: f.page("page_link"),
            image: f.image("image"),
        }
    }
}

impl ProjectsBlock {
    fn decode(f: &Fields<'_>) -> Self {
        Self {
            title: f.text_or("title", ""),
            subtitle: f.text_or("subtitle", ""),
            projects: f
                .items("projects")
                .iter()
                .map(|item| GridItem::decode(item, false))
                .collect(),
        }
    }
}

impl SliderBlock {
    fn decode(f: &Fields<'_>) -> Self {
        Self {
            title: f.text_or("title", ""),
            description: f.text_or("description", ""),
            slides: f
                .items("slides")
                .iter()
                .map(|item| GridItem::decode(item, true))
                .collect(),
            autoplay_enabled: f.flag("autoplay_enabled", true),
            autoplay_delay: f.int_or("autoplay_delay", DEFAULT_SLIDER_AUTOPLAY_DELAY),
        }
    }
}

impl MultiImageBlock {
    fn decode(f: &Fields<'_>) -> Self {
        let images = f
            .items("images")
            .iter()
            .filter_map(|item| {
                Some(StudioImage {
                    image: item.image("image")?,
                    alt: item.text("alt_text").map(str::to_string),
                })
            })
            .collect();

        let cta = f.object("cta").map(|cta| CtaBlock {
            button: ButtonLink::decode(&cta, "button_text", DEFAULT_CTA_BUTTON_TEXT),
            page: cta.page("page_link"),
        });

        Self {
            title: f.text_or("section_title", DEFAULT_STUDIO_TITLE),
            subtitle: f.text_or("section_subtitle", ""),
            description: f.text("description").map(rich_text::paragraphs).unwrap_or_default(),
            images,
            cta,
        }
    }
}

impl GalleryBlock {
    fn decode(f: &Fields<'_>) -> Self {
        Self {
            title: f.text_or("title", ""),
            items: f
                .items("items")
                .iter()
                .map(|item| GalleryItem {
                    image: item.image("image"),
                    caption: item.text_or("caption", ""),
                })
                .collect(),
        }
    }
}

impl CardGridBlock {
    fn decode(f: &Fields<'_>) -> Self {
        Self {
            title: f.text_or("title", ""),
            button: f.object("button").map(|b| ButtonBlock::decode(&b)),
            items: f
                .items("items")
                .iter()
                .map(|item| Card {
                    title: item.text_or("title", ""),
                    text: item.text_or("text", ""),
                    image: item.image("image"),
                    video: item
                        .text("video_url")
                        .map(|url| (url.to_string(), video::classify(url))),
                    link: item
                        .object("href")
                        .map(|href| LinkCandidates::from_href(&href))
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

impl RichTextBlock {
    /// Rich text may be stored under the block's own key (`heading`,
    /// `content`) or directly as the block value.
    fn decode(block_type: &str, value: &Value) -> Self {
        if let Some(html) = value.as_str() {
            return Self {
                paragraphs: rich_text::paragraphs(html),
                css_class: String::new(),
            };
        }
        let f = Fields::new(value);
        let html = f
            .text(block_type)
            .or_else(|| f.text("content"))
            .or_else(|| f.text("text"))
            .unwrap_or("");
        Self {
            paragraphs: rich_text::paragraphs(html),
            css_class: f.text_or("css_class", ""),
        }
    }
}

impl QuoteBlock {
    /// A bare string value is the quote itself.
    fn decode(value: &Value) -> Self {
        if let Some(quote) = value.as_str() {
            return Self {
                quote: quote.to_string(),
                title: None,
                author: String::new(),
                position: String::new(),
                avatar: None,
            };
        }
        let f = Fields::new(value);
        Self {
            quote: f.text_or("quote", ""),
            title: f.text("title").map(str::to_string),
            author: f.text_or("author", ""),
            position: f.text_or("position", ""),
            avatar: f.image("avtar_image").or_else(|| f.image("avatar_image")),
        }
    }
}

impl ButtonBlock {
    fn decode(f: &Fields<'_>) -> Self {
        Self {
            text: f.text_or("text", ""),
            theme: f.text("theme").map(str::to_string),
            link: f
                .object("href")
                .map(|href| LinkCandidates::from_href(&href))
                .unwrap_or_default(),
        }
    }
}

impl VideoBlock {
    fn decode(f: &Fields<'_>) -> Self {
        let url = f.text_or("video_url", "");
        Self {
            kind: video::classify(&url),
            url,
            poster: f.image("poster_image"),
            autoplay: f.flag("is_autoplay", false),
        }
    }
}

impl ListingBlock {
    fn decode(f: &Fields<'_>, default_limit: i64) -> Self {
        Self {
            title: f.text_or("title", ""),
            limit: f.int_or("limit", default_limit),
            button: f.object("button").map(|b| ButtonBlock::decode(&b)),
            landing_page: f.page("landing_page"),
        }
    }
}
