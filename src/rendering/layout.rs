use crate::models::slides::{CarouselSlideKind, VideoSlideType};

/// Visual arrangement of a slide, chosen from its `tipe_slide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Cover,
    Mystery,
    Solution,
    Point,
    Step,
    Site,
    Closing,
    VideoCover,
    VideoPoint,
    VideoQuestion,
    VideoAnswer,
    VideoList,
    VideoQuote,
    VideoTransition,
    VideoClosing,
    /// Anything without a dedicated layout.
    Default,
}

impl Layout {
    pub const ALL: [Layout; 16] = [
        Layout::Cover,
        Layout::Mystery,
        Layout::Solution,
        Layout::Point,
        Layout::Step,
        Layout::Site,
        Layout::Closing,
        Layout::VideoCover,
        Layout::VideoPoint,
        Layout::VideoQuestion,
        Layout::VideoAnswer,
        Layout::VideoList,
        Layout::VideoQuote,
        Layout::VideoTransition,
        Layout::VideoClosing,
        Layout::Default,
    ];

    /// Map a carousel or video `tipe_slide` to its layout. Never fails.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "COVER" => Layout::Cover,
            "MISTERI" => Layout::Mystery,
            "SOLUSI" => Layout::Solution,
            "POIN" => Layout::Point,
            "LANGKAH" => Layout::Step,
            "SITUS" => Layout::Site,
            "CLOSING" => Layout::Closing,
            "VIDEO_COVER" => Layout::VideoCover,
            "VIDEO_POINT" => Layout::VideoPoint,
            "VIDEO_QUESTION" => Layout::VideoQuestion,
            "VIDEO_ANSWER" => Layout::VideoAnswer,
            "VIDEO_LIST" => Layout::VideoList,
            "VIDEO_QUOTE" => Layout::VideoQuote,
            "VIDEO_TRANSITION" => Layout::VideoTransition,
            "VIDEO_CLOSING" => Layout::VideoClosing,
            _ => Layout::Default,
        }
    }

    pub fn for_carousel(kind: &CarouselSlideKind) -> Self {
        Self::from_tag(kind.as_str())
    }

    pub fn for_video(kind: VideoSlideType) -> Self {
        Self::from_tag(kind.as_str())
    }

    /// Also used as the CSS class of the slide.
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Cover => "cover",
            Layout::Mystery => "mystery",
            Layout::Solution => "solution",
            Layout::Point => "point",
            Layout::Step => "step",
            Layout::Site => "site",
            Layout::Closing => "closing",
            Layout::VideoCover => "video-cover",
            Layout::VideoPoint => "video-point",
            Layout::VideoQuestion => "video-question",
            Layout::VideoAnswer => "video-answer",
            Layout::VideoList => "video-list",
            Layout::VideoQuote => "video-quote",
            Layout::VideoTransition => "video-transition",
            Layout::VideoClosing => "video-closing",
            Layout::Default => "default",
        }
    }

    pub fn template_name(&self) -> String {
        format!("layouts/{}.html", self.name())
    }
}
