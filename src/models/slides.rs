use std::fmt;

use serde::{Deserialize, Serialize};

/// The `tipe_slide` discriminator of a carousel slide.
///
/// Tags outside the known set are kept verbatim in [`CarouselSlideKind::Other`]
/// so that hand-written JSON payloads never fail to load; the renderer falls
/// back to its default layout for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CarouselSlideKind {
    Cover,
    Misteri,
    Solusi,
    Poin,
    Langkah,
    Situs,
    Closing,
    Other(String),
}

impl CarouselSlideKind {
    pub fn as_str(&self) -> &str {
        match self {
            CarouselSlideKind::Cover => "COVER",
            CarouselSlideKind::Misteri => "MISTERI",
            CarouselSlideKind::Solusi => "SOLUSI",
            CarouselSlideKind::Poin => "POIN",
            CarouselSlideKind::Langkah => "LANGKAH",
            CarouselSlideKind::Situs => "SITUS",
            CarouselSlideKind::Closing => "CLOSING",
            CarouselSlideKind::Other(tag) => tag,
        }
    }
}

impl From<String> for CarouselSlideKind {
    fn from(tag: String) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "COVER" => CarouselSlideKind::Cover,
            "MISTERI" => CarouselSlideKind::Misteri,
            "SOLUSI" => CarouselSlideKind::Solusi,
            "POIN" => CarouselSlideKind::Poin,
            "LANGKAH" => CarouselSlideKind::Langkah,
            "SITUS" => CarouselSlideKind::Situs,
            "CLOSING" => CarouselSlideKind::Closing,
            _ => CarouselSlideKind::Other(tag),
        }
    }
}

impl From<CarouselSlideKind> for String {
    fn from(kind: CarouselSlideKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for CarouselSlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One panel of an image carousel post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSlide {
    pub tipe_slide: CarouselSlideKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

impl CarouselSlide {
    pub fn new(tipe_slide: CarouselSlideKind, title: impl Into<String>) -> Self {
        Self {
            tipe_slide,
            title: title.into(),
            subtitle: None,
            body: None,
            items: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }
}

/// The carousel post attached to every content item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselData {
    #[serde(default)]
    pub slides: Vec<CarouselSlide>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Presentation role of a vertical-video slide.
///
/// Unlike carousel slides this set is closed: stored documents only ever
/// contain these eight kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoSlideType {
    VideoCover,
    VideoPoint,
    VideoQuestion,
    VideoAnswer,
    VideoList,
    VideoQuote,
    VideoTransition,
    VideoClosing,
}

impl VideoSlideType {
    pub const ALL: [VideoSlideType; 8] = [
        VideoSlideType::VideoCover,
        VideoSlideType::VideoPoint,
        VideoSlideType::VideoQuestion,
        VideoSlideType::VideoAnswer,
        VideoSlideType::VideoList,
        VideoSlideType::VideoQuote,
        VideoSlideType::VideoTransition,
        VideoSlideType::VideoClosing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoSlideType::VideoCover => "VIDEO_COVER",
            VideoSlideType::VideoPoint => "VIDEO_POINT",
            VideoSlideType::VideoQuestion => "VIDEO_QUESTION",
            VideoSlideType::VideoAnswer => "VIDEO_ANSWER",
            VideoSlideType::VideoList => "VIDEO_LIST",
            VideoSlideType::VideoQuote => "VIDEO_QUOTE",
            VideoSlideType::VideoTransition => "VIDEO_TRANSITION",
            VideoSlideType::VideoClosing => "VIDEO_CLOSING",
        }
    }

    /// Parse a slide type the way a language model tends to write it:
    /// any case, with or without the `VIDEO_` prefix, dashes or spaces
    /// instead of underscores, and a handful of synonyms.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_uppercase()
            .replace(['-', ' '], "_");
        let bare = normalized.strip_prefix("VIDEO_").unwrap_or(&normalized);

        match bare {
            "COVER" | "TITLE" | "INTRO" | "HOOK" => Some(VideoSlideType::VideoCover),
            "POINT" | "POIN" | "CONTENT" | "TEXT" => Some(VideoSlideType::VideoPoint),
            "QUESTION" | "MISTERI" | "RIDDLE" => Some(VideoSlideType::VideoQuestion),
            "ANSWER" | "SOLUSI" | "SOLUTION" => Some(VideoSlideType::VideoAnswer),
            "LIST" | "STEPS" | "BULLETS" => Some(VideoSlideType::VideoList),
            "QUOTE" => Some(VideoSlideType::VideoQuote),
            "TRANSITION" | "PAUSE" => Some(VideoSlideType::VideoTransition),
            "CLOSING" | "OUTRO" | "CTA" | "END" => Some(VideoSlideType::VideoClosing),
            _ => None,
        }
    }
}

impl fmt::Display for VideoSlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One panel of a vertical short-form video background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSlide {
    #[serde(rename = "tipe_slide")]
    pub tipe_slide: VideoSlideType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// URL of the screenshot taken from the rendered slide image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_image_url: Option<String>,
    /// URL of the rendered slide page used for the screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_slide_url: Option<String>,
}

impl VideoSlide {
    pub fn new(tipe_slide: VideoSlideType, title: impl Into<String>) -> Self {
        Self {
            tipe_slide,
            title: title.into(),
            subtitle: None,
            body: None,
            items: Vec::new(),
            saved_image_url: None,
            saved_slide_url: None,
        }
    }
}

/// Saved render locations for a single video slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_slide_url: Option<String>,
}

impl SavedUrls {
    pub fn is_empty(&self) -> bool {
        self.saved_image_url.is_none() && self.saved_slide_url.is_none()
    }

    pub fn apply_to(&self, slide: &mut VideoSlide) {
        if let Some(url) = &self.saved_image_url {
            slide.saved_image_url = Some(url.clone());
        }
        if let Some(url) = &self.saved_slide_url {
            slide.saved_slide_url = Some(url.clone());
        }
    }
}
