//! Video source classification.

use serde::Serialize;
use url::Url;

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

const HTML5_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".ogg", ".mov"];

const VIMEO_HOST: &str = "vimeo.com";

/// Hosting provider of a video URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    Youtube,
    Vimeo,
    Html5,
    Unknown,
}

/// Classify a video URL.
///
/// Checks run in a fixed order: YouTube host, then a direct file extension
/// anywhere in the URL, then Vimeo host. A YouTube URL that happens to end in
/// `.mp4` is still YouTube, and a file hosted on Vimeo's CDN with a file
/// extension is HTML5.
pub fn classify(raw: &str) -> VideoKind {
    let host = host_of(raw);

    if YOUTUBE_HOSTS.iter().any(|pattern| host.contains(pattern)) {
        return VideoKind::Youtube;
    }

    let lowered = raw.to_lowercase();
    if HTML5_EXTENSIONS.iter().any(|ext| lowered.contains(ext)) {
        return VideoKind::Html5;
    }

    if host.contains(VIMEO_HOST) {
        return VideoKind::Vimeo;
    }

    VideoKind::Unknown
}

/// Lowercased host, or empty when the URL does not parse or has none.
/// Protocol-relative URLs (`//host/path`) are read as https.
fn host_of(raw: &str) -> String {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")),
        None => Url::parse(raw),
    };
    parsed
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}
