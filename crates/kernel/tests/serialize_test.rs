#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end serialization of persisted pages.
//!
//! Uses the in-memory collaborators from `blockwire-test-utils`; everything
//! else is the real pipeline.

use blockwire_kernel::services::{ImageId, ImageVariantResolver};
use blockwire_kernel::{PageSerializer, SerializeError, SerializerConfig};
use blockwire_test_utils::{
    FakeAssets, FakeReferences, assert, block, list_item, test_page,
};
use serde_json::{Value, json};

fn assets() -> FakeAssets {
    FakeAssets::new()
        .with_image(5, "Garden at dusk")
        .with_image(7, "Deck")
        .with_image(8, "")
        .with_broken_image(9)
}

fn references() -> FakeReferences {
    FakeReferences::new()
        .with_page(3, "About", "/about/")
        .with_page(4, "Projects", "/projects/")
        .with_document(11, "/documents/11/brochure.pdf", 2_000_000)
}

fn serialize_page(config: &SerializerConfig, page: &Value) -> Value {
    let assets = assets();
    let references = references();
    let serializer = PageSerializer::new(config, &assets, &references);
    serde_json::to_value(serializer.serialize_page(page).unwrap()).unwrap()
}

fn landing_page() -> Value {
    test_page("Outdoor Living")
        .with_hero(json!({
            "hero_title": "Welcome",
            "background_video": "https://youtu.be/abc",
            "background_image": 5,
            "autoplay_delay": "6000",
            "slides": [
                list_item(json!({
                    "title": "Decks",
                    "description": "Built to last",
                    "button_text": "See decks",
                    "page_link": 4,
                    "image": 7
                }))
            ]
        }))
        .with_block("heading", "h1", json!({ "heading": "<h2>Our work</h2>" }))
        .with_block("table", "t1", json!({ "rows": [["a", "b"]] }))
        .with_block(
            "content",
            "c1",
            json!({ "content": "<p>A</p><p>B<br/>C</p>" }),
        )
        .with_block(
            "button",
            "b1",
            json!({ "text": "Brochure", "href": { "document_link": 11 } }),
        )
        .to_json()
}

#[test]
fn page_metadata_and_block_order() {
    let out = serialize_page(&SerializerConfig::default(), &landing_page());

    assert_eq!(out["title"], "Outdoor Living");
    assert_eq!(out["slug"], "outdoor-living");

    let ids: Vec<&str> = out["body"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["heading_h1", "table_t1", "content_c1", "button_b1"]);
}

#[test]
fn unrecognized_block_passes_through_and_serialization_continues() {
    let out = serialize_page(&SerializerConfig::default(), &landing_page());
    let body = &out["body"];

    assert::json_eq(
        &body[1],
        &json!({ "type": "table", "id": "table_t1", "value": { "rows": [["a", "b"]] } }),
    );
    assert_eq!(body[2]["value"]["paragraphs"], json!(["A", "B\nC"]));
}

#[test]
fn hero_video_wins_over_background_image() {
    let out = serialize_page(&SerializerConfig::default(), &landing_page());
    let hero = &out["hero"];

    assert::json_eq(
        &hero["background"],
        &json!({ "video_url": "https://youtu.be/abc", "video_type": "youtube" }),
    );
    assert_eq!(hero["title"], "Welcome");
    assert_eq!(hero["cta"], json!({ "text": "Get a Free Site Visit", "link": "#contact" }));
    assert_eq!(
        hero["settings"],
        json!({ "autoplay_enabled": true, "autoplay_delay": 6000 })
    );
}

#[test]
fn hero_without_video_uses_background_image() {
    let page = test_page("Home")
        .with_hero(json!({ "background_image": 5 }))
        .to_json();
    let out = serialize_page(&SerializerConfig::default(), &page);
    let background = &out["hero"]["background"];

    assert!(background.get("video_url").is_none());
    assert_eq!(background["image"]["alt"], "Garden at dusk");
    assert::contains(
        background["image"]["desktop"].as_str().unwrap(),
        "fill-2560x1440",
    );
}

#[test]
fn hero_slide_images_shrink_towards_mobile() {
    let out = serialize_page(&SerializerConfig::default(), &landing_page());
    let slide = &out["hero"]["slides"][0];

    assert_eq!(slide["id"], 1);
    assert_eq!(slide["button"]["text"], "See decks");
    assert_eq!(slide["button"]["url"], "/projects/");
    assert_eq!(slide["button"]["opens_new_tab"], false);

    let image = &slide["image"];
    let desktop = image["desktop"].as_str().unwrap();
    let tablet = image["tablet"].as_str().unwrap();
    let mobile = image["mobile"].as_str().unwrap();
    assert_ne!(desktop, tablet);
    assert_ne!(tablet, mobile);
    assert_ne!(desktop, mobile);
    assert!(assert::rendition_area(desktop) >= assert::rendition_area(tablet));
    assert!(assert::rendition_area(tablet) >= assert::rendition_area(mobile));
    assert_eq!(
        desktop,
        "http://127.0.0.1:8000/media/images/7.fill-1200x480.format-webp.webp"
    );

    // No dedicated full-size asset: the main image is used at full-size specs.
    assert::contains(
        slide["full_image"]["desktop"].as_str().unwrap(),
        "/media/images/7.width-3840",
    );
}

#[test]
fn unmapped_component_uses_default_content_image() {
    let config = SerializerConfig::default();
    let resolver = ImageVariantResolver::new(&config.images, &config.base_url);
    let image = resolver
        .resolve_id("unknown_type", "image", ImageId(8), &assets())
        .unwrap();

    assert::contains(&image.desktop, "fill-1200x800");
    assert::contains(&image.tablet, "fill-1000x700");
    assert::contains(&image.mobile, "fill-700x500");
    assert_eq!(image.alt, "Image");
}

#[test]
fn document_link_reports_size() {
    let out = serialize_page(&SerializerConfig::default(), &landing_page());
    let button = &out["body"][3]["value"];

    assert_eq!(button["text"], "Brochure");
    assert_eq!(button["link"]["url"], "/documents/11/brochure.pdf");
    assert_eq!(button["link"]["opens_new_tab"], true);
    assert_eq!(button["link"]["detail"]["type"], "MB");
}

#[test]
fn serialization_is_idempotent() {
    let config = SerializerConfig::default();
    let page = landing_page();
    let first = serde_json::to_string(&serialize_page(&config, &page)).unwrap();
    let second = serde_json::to_string(&serialize_page(&config, &page)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn collaborator_failures_stay_local() {
    let page = test_page("Gallery")
        .with_block(
            "horizontal_slider",
            "s1",
            json!({
                "title": "Recent",
                "slides": [
                    { "title": "Broken", "image": 9, "page_link": 404 },
                    { "title": "Missing", "image": 1234 },
                    { "title": "Fine", "image": 7, "page_link": 3 }
                ]
            }),
        )
        .with_block("divider", "d1", json!({}))
        .to_json();
    let out = serialize_page(&SerializerConfig::default(), &page);
    let slides = &out["body"][0]["value"]["slides"];

    assert::null_key(&slides[0], "image");
    assert::null_key(&slides[0], "page_link");
    assert_eq!(slides[0]["button"]["url"], "#");
    assert::null_key(&slides[1], "image");
    assert_eq!(slides[2]["page_link"], json!({ "id": 3, "title": "About", "url": "/about/" }));
    assert_eq!(slides[2]["button"]["url"], "/about/");
    assert::contains(
        slides[2]["image"]["desktop"].as_str().unwrap(),
        "fill-1600x1200",
    );
    assert_eq!(out["body"][1]["value"], json!({}));
}

#[test]
fn multi_image_content_overrides_alt_text() {
    let page = test_page("Studio")
        .with_block(
            "multi_image_content",
            "m1",
            json!({
                "section_subtitle": "Design studio",
                "description": "<p>Plan</p><p>Build</p>",
                "images": [
                    { "image": 5, "alt_text": "Evening garden" },
                    { "image": 7 },
                    { "alt_text": "no asset" }
                ],
                "cta": { "button_text": "Book", "is_external_link": true, "external_url": "https://book.example.com" }
            }),
        )
        .to_json();
    let out = serialize_page(&SerializerConfig::default(), &page);
    let value = &out["body"][0]["value"];

    assert_eq!(value["title"], "Bring your dream home to life");
    assert_eq!(value["description"], json!(["Plan", "Build"]));
    assert_eq!(value["images"].as_array().unwrap().len(), 2);
    assert_eq!(value["images"][0]["alt"], "Evening garden");
    assert_eq!(value["images"][1]["alt"], "Deck");
    assert::contains(
        value["images"][0]["desktop"].as_str().unwrap(),
        "fill-1400x1200",
    );
    assert::json_eq(
        &value["cta"],
        &json!({
            "text": "Book",
            "url": "https://book.example.com",
            "opens_new_tab": true,
            "page_link": null
        }),
    );
}

#[test]
fn alternate_rendition_table_from_yaml() {
    let yaml = r#"
base_url: "https://cms.example.com"
link_placeholder: "javascript:void(0)"
images:
  default_config: small
  configs:
    small:
      desktop: fill-300x200
      tablet: fill-200x150
      mobile: fill-100x75
"#;
    let config = SerializerConfig::from_yaml_str(yaml).unwrap();
    let page = test_page("Alt")
        .with_block("image", "i1", json!({ "image": 7, "caption": "Deck" }))
        .with_block("button", "b1", json!({ "text": "Nowhere" }))
        .to_json();
    let out = serialize_page(&config, &page);

    assert_eq!(
        out["body"][0]["value"]["image"]["mobile"],
        "https://cms.example.com/media/images/7.fill-100x75.webp"
    );
    assert_eq!(out["body"][1]["value"]["link"]["url"], "javascript:void(0)");
}

#[test]
fn malformed_root_is_the_only_top_level_failure() {
    let config = SerializerConfig::default();
    let assets = assets();
    let references = references();
    let serializer = PageSerializer::new(&config, &assets, &references);

    let err = serializer.serialize_page(&json!("not a page")).unwrap_err();
    assert!(matches!(err, SerializeError::MalformedTree(_)));

    let odd_records = json!({
        "title": "Odd",
        "body": [
            42,
            block("space", "s", json!("tall")),
            { "type": "video", "value": { "video_url": "https://vimeo.com/123", "is_autoplay": true } }
        ]
    });
    let page = serializer.serialize_page(&odd_records).unwrap();
    assert_eq!(page.body.len(), 3);
    assert_eq!(page.body[0].block_type, "unknown");
    assert_eq!(page.body[1].value, json!({ "height": 50 }));
    assert_eq!(page.body[2].id, "video_2");
    assert_eq!(page.body[2].value["video_type"], "vimeo");
    assert_eq!(page.body[2].value["autoplay"], true);
}
