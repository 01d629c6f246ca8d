//! Turns whatever the language model answered into valid video slides.
//!
//! Models wrap JSON in markdown fences, add prose around it, wrap the array
//! in an object, invent slide types and rename fields. Everything that can be
//! mapped onto the eight slide kinds is kept; the rest is dropped. When
//! nothing usable is left, a single point slide built from the item is used.

use serde_json::{Map, Value};

use crate::models::content::ContentItem;
use crate::models::slides::{VideoSlide, VideoSlideType};

const TYPE_KEYS: &[&str] = &["tipe_slide", "tipeSlide", "type", "slide_type"];
const TITLE_KEYS: &[&str] = &["title", "judul", "heading", "headline", "text"];
const BODY_KEYS: &[&str] = &["body", "content", "text", "description", "isi"];
const ITEM_TEXT_KEYS: &[&str] = &["text", "title", "label", "value"];

#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub slides: Vec<VideoSlide>,
    /// The answer needed at least one fix to be usable.
    pub repaired: bool,
    /// Nothing usable was found; `slides` holds the default slide.
    pub fallback: bool,
}

pub fn repair_video_slides(raw: &str, item: &ContentItem) -> RepairOutcome {
    let Some((values, mut repaired)) = parse_slide_values(raw) else {
        return fallback_outcome(item);
    };

    let mut slides = Vec::with_capacity(values.len());
    for value in &values {
        match normalize_slide(value) {
            Some((slide, changed)) => {
                repaired |= changed;
                slides.push(slide);
            }
            None => repaired = true,
        }
    }

    if slides.is_empty() {
        return fallback_outcome(item);
    }

    RepairOutcome {
        slides,
        repaired,
        fallback: false,
    }
}

/// The slide used when the model's answer is unusable.
pub fn fallback_slide(item: &ContentItem) -> VideoSlide {
    let mut slide = VideoSlide::new(VideoSlideType::VideoPoint, item.title.trim());
    let description = item.description.trim();
    if !description.is_empty() {
        slide.body = Some(description.to_string());
    }
    slide
}

fn fallback_outcome(item: &ContentItem) -> RepairOutcome {
    RepairOutcome {
        slides: vec![fallback_slide(item)],
        repaired: true,
        fallback: true,
    }
}

/// Locate the slide array in the answer. The flag tells whether anything
/// had to be stripped or unwrapped.
fn parse_slide_values(raw: &str) -> Option<(Vec<Value>, bool)> {
    let trimmed = raw.trim();
    let text = strip_code_fences(trimmed);
    let stripped = text != trimmed;

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if let Some((values, unwrapped)) = slide_array(value) {
            return Some((values, stripped || unwrapped));
        }
    }

    for (open, close) in [('[', ']'), ('{', '}')] {
        let Some(slice) = outermost(text, open, close) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<Value>(slice) {
            if let Some((values, _)) = slide_array(value) {
                return Some((values, true));
            }
        }
    }

    None
}

fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the language tag line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn outermost(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn slide_array(value: Value) -> Option<(Vec<Value>, bool)> {
    match value {
        Value::Array(values) => Some((values, false)),
        Value::Object(mut object) => {
            for key in ["slides", "videoSlides", "video_slides"] {
                if let Some(Value::Array(values)) = object.remove(key) {
                    return Some((values, true));
                }
            }
            if TYPE_KEYS.iter().any(|k| object.contains_key(*k)) {
                return Some((vec![Value::Object(object)], true));
            }
            None
        }
        _ => None,
    }
}

/// Map one answer element onto a slide. `None` when it holds no text at all.
fn normalize_slide(value: &Value) -> Option<(VideoSlide, bool)> {
    let object = value.as_object()?;
    let mut changed = false;

    let raw_type = first_string(object, TYPE_KEYS);
    let tipe_slide = match raw_type.and_then(|(key, t)| {
        VideoSlideType::parse_lenient(t).map(|parsed| (key, t, parsed))
    }) {
        Some((key, t, parsed)) => {
            changed |= key != "tipe_slide" || t != parsed.as_str();
            parsed
        }
        None => {
            changed = true;
            VideoSlideType::VideoPoint
        }
    };

    let title = match first_string(object, TITLE_KEYS) {
        Some((key, title)) => {
            changed |= key != "title";
            title.trim().to_string()
        }
        None => String::new(),
    };

    let subtitle = first_string(object, &["subtitle", "subjudul"]).map(|(_, s)| s.trim().to_string());
    // A key already used for the title does not count as body
    let body = BODY_KEYS
        .iter()
        .filter_map(|key| first_string(object, &[*key]))
        .find(|(_, b)| b.trim() != title)
        .map(|(key, b)| {
            changed |= key != "body";
            b.trim().to_string()
        });

    let (items, items_changed) = normalize_items(object.get("items"));
    changed |= items_changed;

    if title.is_empty() && body.is_none() && items.is_empty() {
        return None;
    }

    let mut slide = VideoSlide::new(tipe_slide, title);
    slide.subtitle = subtitle.filter(|s| !s.is_empty());
    slide.body = body.filter(|b| !b.is_empty());
    slide.items = items;
    Some((slide, changed))
}

fn first_string<'a>(object: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a str)> {
    keys.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(|s| (*key, s))
    })
}

fn normalize_items(value: Option<&Value>) -> (Vec<String>, bool) {
    match value {
        None | Some(Value::Null) => (Vec::new(), false),
        Some(Value::String(text)) => (
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            true,
        ),
        Some(Value::Array(values)) => {
            let mut changed = false;
            let items = values
                .iter()
                .filter_map(|v| {
                    let text = match v {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Number(n) => {
                            changed = true;
                            Some(n.to_string())
                        }
                        Value::Object(o) => {
                            changed = true;
                            first_string(o, ITEM_TEXT_KEYS).map(|(_, s)| s.trim().to_string())
                        }
                        _ => {
                            changed = true;
                            None
                        }
                    };
                    text.filter(|t| !t.is_empty())
                })
                .collect();
            (items, changed)
        }
        Some(_) => (Vec::new(), true),
    }
}
