use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::content::{ContentDetails, ContentKind};
use crate::models::slides::CarouselData;

/// List fields a form may also submit as newline-separated text.
const LIST_FIELDS: &[&str] = &["points", "steps", "features", "tools", "hashtags"];

/// A validated `/api/generate-{kind}` submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratePayload {
    pub kind: ContentKind,
    pub title: String,
    pub description: String,
    pub details: ContentDetails,
    pub hashtags: Vec<String>,
    /// Present when the operator supplied the carousel as raw JSON.
    pub carousel_data: Option<CarouselData>,
}

impl GeneratePayload {
    pub fn is_json_mode(&self) -> bool {
        self.carousel_data.is_some()
    }
}

/// Parse and validate a raw generate request body.
///
/// A body carrying `carouselData` is taken as a complete JSON document and
/// only needs `title` plus a non-empty slide list; any other body is a form
/// submission and must fill in every required field of `kind`. All missing
/// fields are reported together.
pub fn parse_generate_payload(kind: ContentKind, raw: &str) -> Result<GeneratePayload, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;

    let Value::Object(mut object) = value else {
        return Err(AppError::BadRequest("Payload must be a JSON object".into()));
    };

    if let Some(declared) = object.get("kind").and_then(Value::as_str) {
        if ContentKind::from_str_ci(declared) != Some(kind) {
            return Err(AppError::BadRequest(format!(
                "Payload kind '{}' does not match endpoint kind '{}'",
                declared, kind
            )));
        }
    }

    for field in LIST_FIELDS {
        if let Some(Value::String(text)) = object.get(*field) {
            let items = if *field == "hashtags" {
                split_tags(text)
            } else {
                split_list(text)
            };
            object.insert(field.to_string(), Value::Array(items));
        }
    }

    let json_mode = object.contains_key("carouselData");
    let required: &[&str] = if json_mode {
        &["title", "carouselData"]
    } else {
        kind.required_fields()
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| is_missing(object.get(*key)))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )));
    }

    let title = string_field(&object, "title")?.unwrap_or_default();
    let description = string_field(&object, "description")?.unwrap_or_default();

    let hashtags = match object.get("hashtags") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<String>>(value.clone())
            .map_err(|e| AppError::BadRequest(format!("Invalid hashtags: {e}")))?,
    };

    let carousel_data = if json_mode {
        Some(parse_carousel_data(&object["carouselData"])?)
    } else {
        None
    };

    let object = Value::Object(object);
    let details = ContentDetails::from_value(kind, &object)
        .map_err(|e| AppError::BadRequest(format!("Invalid {} fields: {e}", kind)))?;

    Ok(GeneratePayload {
        kind,
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        details,
        hashtags,
        carousel_data,
    })
}

/// Validate the `carouselData` object of a JSON-mode payload.
pub fn parse_carousel_data(value: &Value) -> Result<CarouselData, AppError> {
    let slides = value
        .get("slides")
        .and_then(Value::as_array)
        .filter(|slides| !slides.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("carouselData.slides must be a non-empty array".into())
        })?;

    for (index, slide) in slides.iter().enumerate() {
        let has_type = slide
            .get("tipe_slide")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        if !has_type {
            return Err(AppError::BadRequest(format!(
                "carouselData.slides[{index}] is missing tipe_slide"
            )));
        }
    }

    serde_json::from_value(value.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid carouselData: {e}")))
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>, AppError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::BadRequest(format!("{key} must be a string"))),
    }
}

fn split_list(text: &str) -> Vec<Value> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Value::String(line.to_string()))
        .collect()
}

fn split_tags(text: &str) -> Vec<Value> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tag| !tag.is_empty())
        .map(|tag| Value::String(tag.to_string()))
        .collect()
}
