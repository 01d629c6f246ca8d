use crate::carousel::payload::GeneratePayload;
use crate::models::category::CategoryProfile;
use crate::models::content::ContentDetails;
use crate::models::slides::{CarouselData, CarouselSlide, CarouselSlideKind};

/// Build the carousel of a form submission, or finish the one supplied in
/// JSON mode.
pub fn carousel_for(payload: &GeneratePayload, profile: &CategoryProfile) -> CarouselData {
    match &payload.carousel_data {
        Some(data) => {
            let mut data = data.clone();
            if data.caption.trim().is_empty() {
                data.caption = caption(&payload.title, &payload.description, profile);
            }
            let mut tags = payload.hashtags.clone();
            tags.extend(data.hashtags.drain(..));
            data.hashtags = merge_hashtags(&tags, &profile.hashtags);
            data
        }
        None => build_carousel(payload, profile),
    }
}

/// Lay out the slides of a form submission.
///
/// Every kind opens with a COVER and ends with a CLOSING slide; the body
/// depends on the kind.
pub fn build_carousel(payload: &GeneratePayload, profile: &CategoryProfile) -> CarouselData {
    let description = Some(payload.description.clone());
    let mut slides = vec![CarouselSlide::new(CarouselSlideKind::Cover, &payload.title)
        .with_subtitle(description.clone())];

    match &payload.details {
        ContentDetails::Riddle(riddle) => {
            slides.push(
                CarouselSlide::new(CarouselSlideKind::Misteri, "Teka-teki")
                    .with_body(Some(riddle.riddle.clone()))
                    .with_subtitle(riddle.hint.clone()),
            );
            slides.push(
                CarouselSlide::new(CarouselSlideKind::Solusi, "Jawaban")
                    .with_body(Some(riddle.solution.clone()))
                    .with_subtitle(riddle.explanation.clone()),
            );
        }
        ContentDetails::Site(site) => {
            slides.push(
                CarouselSlide::new(CarouselSlideKind::Situs, &payload.title)
                    .with_subtitle(Some(site.url.clone()))
                    .with_body(description)
                    .with_items(site.features.clone()),
            );
        }
        ContentDetails::Topic(topic) => {
            for (i, point) in topic.points.iter().enumerate() {
                slides.push(
                    CarouselSlide::new(CarouselSlideKind::Poin, format!("Poin {}", i + 1))
                        .with_body(Some(point.clone())),
                );
            }
        }
        ContentDetails::Tutorial(tutorial) => {
            for (i, step) in tutorial.steps.iter().enumerate() {
                let mut slide =
                    CarouselSlide::new(CarouselSlideKind::Langkah, format!("Langkah {}", i + 1))
                        .with_body(Some(step.clone()));
                if i == 0 {
                    slide = slide.with_items(tutorial.tools.clone());
                }
                slides.push(slide);
            }
        }
    }

    slides.push(
        CarouselSlide::new(CarouselSlideKind::Closing, &profile.closing_text)
            .with_body(Some(profile.handle.clone())),
    );

    CarouselData {
        slides,
        caption: caption(&payload.title, &payload.description, profile),
        hashtags: merge_hashtags(&payload.hashtags, &profile.hashtags),
    }
}

fn caption(title: &str, description: &str, profile: &CategoryProfile) -> String {
    [title, description, profile.closing_text.as_str()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `#`-prefix a tag and strip whitespace; `None` when nothing is left.
pub fn normalize_hashtag(raw: &str) -> Option<String> {
    let bare: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_start_matches('#')
        .to_string();
    if bare.is_empty() {
        None
    } else {
        Some(format!("#{bare}"))
    }
}

/// Operator tags first, then branding tags, without case-insensitive
/// duplicates.
pub fn merge_hashtags(own: &[String], branding: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    own.iter()
        .chain(branding)
        .filter_map(|tag| normalize_hashtag(tag))
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}
