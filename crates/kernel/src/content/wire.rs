//! Wire types of the frontend JSON contract.
//!
//! Field names and nesting here are the contract; keys documented as always
//! present serialize as `null` rather than being omitted.

use serde::Serialize;
use serde_json::Value;

use super::link::ResolvedLink;
use super::video::VideoKind;
use crate::services::{PageRef, ResponsiveImage};

/// One serialized page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDocument {
    pub title: String,
    pub slug: String,
    pub hero: Option<Hero>,
    pub body: Vec<WireNode>,
}

/// One serialized block, in authored order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireNode {
    #[serde(rename = "type")]
    pub block_type: String,
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub text: String,
    #[serde(flatten)]
    pub link: ResolvedLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    pub title: String,
    pub cta: HeroCta,
    pub background: HeroBackground,
    pub slides: Vec<HeroSlide>,
    pub settings: AutoplaySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroCta {
    pub text: String,
    pub link: String,
}

/// Video or image, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeroBackground {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_type: Option<VideoKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ResponsiveImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroSlide {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub button: Button,
    pub image: Option<ResponsiveImage>,
    pub full_image: Option<ResponsiveImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoplaySettings {
    pub autoplay_enabled: bool,
    pub autoplay_delay: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    pub title: String,
    pub description: String,
    pub button: Button,
    pub page_link: Option<PageRef>,
    pub image: Option<ResponsiveImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projects {
    pub title: String,
    pub subtitle: String,
    pub projects: Vec<GridItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalSlider {
    pub title: String,
    pub description: String,
    pub slides: Vec<GridItem>,
    pub autoplay_enabled: bool,
    pub autoplay_delay: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cta {
    #[serde(flatten)]
    pub button: Button,
    pub page_link: Option<PageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiImageContent {
    pub title: String,
    pub subtitle: String,
    pub description: Vec<String>,
    pub images: Vec<ResponsiveImage>,
    pub cta: Option<Cta>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryItem {
    pub caption: String,
    pub image: Option<ResponsiveImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gallery {
    pub title: String,
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub text: String,
    pub image: Option<ResponsiveImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_type: Option<VideoKind>,
    pub link: ResolvedLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardGrid {
    pub title: String,
    pub button: Option<ThemedButton>,
    pub items: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    pub paragraphs: Vec<String>,
    pub css_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub text: String,
    pub css_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub author: String,
    pub position: String,
    pub avatar: Option<ResponsiveImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub image: Option<ResponsiveImage>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemedButton {
    pub text: String,
    pub theme: Option<String>,
    pub link: ResolvedLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleButtons {
    pub buttons: Vec<ThemedButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub video_url: String,
    pub video_type: VideoKind,
    pub poster: Option<ResponsiveImage>,
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccordionItem {
    pub title: String,
    pub content: Vec<WireNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accordion {
    pub items: Vec<AccordionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Space {
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub title: String,
    pub limit: i64,
    pub button: Option<ThemedButton>,
    pub landing_page: Option<PageRef>,
}
