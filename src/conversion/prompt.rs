use crate::error::AppError;
use crate::models::content::{ContentItem, ContentKind};
use crate::models::slides::{CarouselSlide, VideoSlideType};

const PROMPT_TEMPLATE: &str = include_str!("../../templates/prompt.txt");

/// Build the text-generation prompt converting the stored carousel of `item`
/// into vertical-video slides.
pub fn build_prompt(item: &ContentItem) -> Result<String, AppError> {
    let kind = item.kind();
    let slides: Vec<String> = item.carousel_data.slides.iter().map(describe_slide).collect();
    let slide_types: Vec<&str> = VideoSlideType::ALL.iter().map(|t| t.as_str()).collect();

    let mut context = tera::Context::new();
    context.insert("subject", subject(kind));
    context.insert("title", &item.title);
    context.insert("description", item.description.trim());
    context.insert("slides", &slides);
    context.insert("structure", structure(kind));
    context.insert("slide_types", &slide_types);

    let prompt = tera::Tera::one_off(PROMPT_TEMPLATE, &context, false)
        .map_err(|e| AppError::Internal(format!("Failed to render prompt: {e}")))?;
    Ok(prompt.trim_end().to_string())
}

fn subject(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Riddle => "riddle",
        ContentKind::Site => "recommended website",
        ContentKind::Topic => "topic",
        ContentKind::Tutorial => "tutorial",
    }
}

fn structure(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Riddle => {
            "VIDEO_COVER, then VIDEO_QUESTION with the riddle, then a VIDEO_TRANSITION \
             giving the viewer time to think, then VIDEO_ANSWER with the solution, then VIDEO_CLOSING."
        }
        ContentKind::Site => {
            "VIDEO_COVER naming the site, VIDEO_POINT slides for what it does, \
             a VIDEO_LIST of its best features, then VIDEO_CLOSING."
        }
        ContentKind::Topic => {
            "VIDEO_COVER, one VIDEO_POINT per key point, an optional VIDEO_QUOTE \
             summarising the topic, then VIDEO_CLOSING."
        }
        ContentKind::Tutorial => {
            "VIDEO_COVER, a VIDEO_LIST of what is needed, one VIDEO_POINT per step, then VIDEO_CLOSING."
        }
    }
}

fn describe_slide(slide: &CarouselSlide) -> String {
    let mut parts = vec![format!("[{}] {}", slide.tipe_slide, slide.title.trim())];
    if let Some(subtitle) = &slide.subtitle {
        parts.push(format!("subtitle: {}", subtitle.trim()));
    }
    if let Some(body) = &slide.body {
        parts.push(format!("body: {}", body.trim()));
    }
    if !slide.items.is_empty() {
        parts.push(format!("items: {}", slide.items.join("; ")));
    }
    parts.join(" | ")
}
