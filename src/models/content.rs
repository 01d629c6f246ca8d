use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::slides::{CarouselData, VideoSlide};

/// The content bucket an item belongs to.
///
/// Each kind owns one REST resource, one generate endpoint and one MongoDB
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Riddle,
    Site,
    Topic,
    Tutorial,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Riddle,
        ContentKind::Site,
        ContentKind::Topic,
        ContentKind::Tutorial,
    ];

    /// Singular name, as used by `/api/generate-{kind}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Riddle => "riddle",
            ContentKind::Site => "site",
            ContentKind::Topic => "topic",
            ContentKind::Tutorial => "tutorial",
        }
    }

    /// Plural REST resource name, also used as the collection name.
    pub fn resource(&self) -> &'static str {
        match self {
            ContentKind::Riddle => "riddles",
            ContentKind::Site => "sites",
            ContentKind::Topic => "topics",
            ContentKind::Tutorial => "tutorials",
        }
    }

    pub fn from_resource(resource: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.resource() == resource)
    }

    /// Accepts either the singular or the plural name, case-insensitively.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == lower || k.resource() == lower)
    }

    /// Payload keys a form submission of this kind must fill in.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ContentKind::Riddle => &["title", "riddle", "solution"],
            ContentKind::Site => &["title", "url", "description"],
            ContentKind::Topic => &["title", "description", "points"],
            ContentKind::Tutorial => &["title", "description", "steps"],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiddleDetails {
    /// The riddle question itself.
    #[serde(default)]
    pub riddle: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteDetails {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicDetails {
    #[serde(default)]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorialDetails {
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Category-specific fields, tagged by `kind` and flattened into the
/// content document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentDetails {
    Riddle(RiddleDetails),
    Site(SiteDetails),
    Topic(TopicDetails),
    Tutorial(TutorialDetails),
}

impl ContentDetails {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentDetails::Riddle(_) => ContentKind::Riddle,
            ContentDetails::Site(_) => ContentKind::Site,
            ContentDetails::Topic(_) => ContentKind::Topic,
            ContentDetails::Tutorial(_) => ContentKind::Tutorial,
        }
    }

    /// Pick the fields of `kind` out of a payload object, ignoring the rest.
    pub fn from_value(kind: ContentKind, value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        use serde_json::from_value;

        let value = value.clone();
        Ok(match kind {
            ContentKind::Riddle => ContentDetails::Riddle(from_value(value)?),
            ContentKind::Site => ContentDetails::Site(from_value(value)?),
            ContentKind::Topic => ContentDetails::Topic(from_value(value)?),
            ContentKind::Tutorial => ContentDetails::Tutorial(from_value(value)?),
        })
    }
}

/// A riddle, site, topic or tutorial stored in MongoDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Hex-encoded ObjectId; hex order is creation order.
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub details: ContentDetails,
    #[serde(default)]
    pub carousel_data: CarouselData,
    /// Absent until generated; never stored as an empty sequence.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_video_slides"
    )]
    pub video_slides: Option<Vec<VideoSlide>>,
    /// Incremented on every write of `video_slides`.
    #[serde(default)]
    pub video_slides_revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_slides_updated_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    pub fn new(
        title: String,
        description: String,
        details: ContentDetails,
        carousel_data: CarouselData,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: bson::oid::ObjectId::new().to_hex(),
            title,
            description,
            details,
            carousel_data,
            video_slides: None,
            video_slides_revision: 0,
            created_at: now,
            updated_at: now,
            video_slides_updated_at: None,
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.details.kind()
    }

    /// Replace the video slides, bumping the revision.
    ///
    /// An empty sequence removes the field altogether.
    pub fn replace_video_slides(&mut self, slides: Vec<VideoSlide>, now: DateTime<Utc>) {
        self.video_slides = normalize_video_slides(Some(slides));
        self.video_slides_revision += 1;
        self.video_slides_updated_at = Some(now);
        self.updated_at = now;
    }
}

/// Collapse an empty slide sequence to "absent".
pub fn normalize_video_slides(slides: Option<Vec<VideoSlide>>) -> Option<Vec<VideoSlide>> {
    slides.filter(|s| !s.is_empty())
}

fn deserialize_video_slides<'de, D>(deserializer: D) -> Result<Option<Vec<VideoSlide>>, D::Error>
where
    D: Deserializer<'de>,
{
    let slides = Option::<Vec<VideoSlide>>::deserialize(deserializer)?;
    Ok(normalize_video_slides(slides))
}
