use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;
use crate::models::category::CategoryProfile;
use crate::models::content::ContentItem;
use crate::models::slides::{CarouselSlide, VideoSlide};
use crate::rendering::layout::Layout;
use crate::rendering::markdown::render_inline;

const PAGE_TEMPLATE: &str = "page.html";

/// Templates are compiled into the binary.
const TEMPLATES: &[(&str, &str)] = &[
    ("page.html", include_str!("../../templates/page.html")),
    ("layouts/_footer.html", include_str!("../../templates/layouts/_footer.html")),
    ("layouts/cover.html", include_str!("../../templates/layouts/cover.html")),
    ("layouts/mystery.html", include_str!("../../templates/layouts/mystery.html")),
    ("layouts/solution.html", include_str!("../../templates/layouts/solution.html")),
    ("layouts/point.html", include_str!("../../templates/layouts/point.html")),
    ("layouts/step.html", include_str!("../../templates/layouts/step.html")),
    ("layouts/site.html", include_str!("../../templates/layouts/site.html")),
    ("layouts/closing.html", include_str!("../../templates/layouts/closing.html")),
    ("layouts/video-cover.html", include_str!("../../templates/layouts/video-cover.html")),
    ("layouts/video-point.html", include_str!("../../templates/layouts/video-point.html")),
    ("layouts/video-question.html", include_str!("../../templates/layouts/video-question.html")),
    ("layouts/video-answer.html", include_str!("../../templates/layouts/video-answer.html")),
    ("layouts/video-list.html", include_str!("../../templates/layouts/video-list.html")),
    ("layouts/video-quote.html", include_str!("../../templates/layouts/video-quote.html")),
    ("layouts/video-transition.html", include_str!("../../templates/layouts/video-transition.html")),
    ("layouts/video-closing.html", include_str!("../../templates/layouts/video-closing.html")),
    ("layouts/default.html", include_str!("../../templates/layouts/default.html")),
];

/// Output page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    /// 4:5 Instagram carousel panel.
    Carousel,
    /// 9:16 vertical video frame.
    Video,
}

impl PageFormat {
    pub fn size(&self) -> (u32, u32) {
        match self {
            PageFormat::Carousel => (1080, 1350),
            PageFormat::Video => (1080, 1920),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PageFormat::Carousel => "carousel",
            PageFormat::Video => "video",
        }
    }
}

/// Template view of one slide, text already rendered to HTML.
#[derive(Debug, Serialize)]
struct SlideView {
    layout: &'static str,
    tag: String,
    title: String,
    subtitle: Option<String>,
    body: Option<String>,
    items: Vec<String>,
    #[serde(skip)]
    template: String,
}

impl SlideView {
    fn new(
        layout: Layout,
        tag: &str,
        title: &str,
        subtitle: Option<&str>,
        body: Option<&str>,
        items: &[String],
    ) -> Self {
        let html = |text: &str| Some(render_inline(text)).filter(|h| !h.is_empty());
        Self {
            layout: layout.name(),
            tag: tag.to_string(),
            title: title.to_string(),
            subtitle: subtitle.and_then(html),
            body: body.and_then(html),
            items: items.iter().map(|i| render_inline(i)).collect(),
            template: layout.template_name(),
        }
    }
}

impl From<&CarouselSlide> for SlideView {
    fn from(slide: &CarouselSlide) -> Self {
        Self::new(
            Layout::for_carousel(&slide.tipe_slide),
            slide.tipe_slide.as_str(),
            &slide.title,
            slide.subtitle.as_deref(),
            slide.body.as_deref(),
            &slide.items,
        )
    }
}

impl From<&VideoSlide> for SlideView {
    fn from(slide: &VideoSlide) -> Self {
        Self::new(
            Layout::for_video(slide.tipe_slide),
            slide.tipe_slide.as_str(),
            &slide.title,
            slide.subtitle.as_deref(),
            slide.body.as_deref(),
            &slide.items,
        )
    }
}

/// Renders slides to standalone HTML pages sized for screenshotting.
pub struct SlideRenderer {
    tera: Tera,
}

impl SlideRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| AppError::Internal(format!("Failed to load slide templates: {e}")))?;
        Ok(Self { tera })
    }

    /// Page holding the `index`-th carousel slide (0-based).
    pub fn render_carousel_slide(
        &self,
        item: &ContentItem,
        profile: &CategoryProfile,
        index: usize,
    ) -> Result<String, AppError> {
        let slides = &item.carousel_data.slides;
        let slide = slides.get(index).ok_or_else(|| {
            AppError::NotFound(format!(
                "Carousel slide {} of '{}' not found ({} slides)",
                index,
                item.id,
                slides.len()
            ))
        })?;
        let fragment = self.render_fragment(&slide.into(), index, slides.len(), item, profile)?;
        self.render_page(PageFormat::Carousel, &item.title, vec![fragment])
    }

    /// Page holding every carousel slide in order.
    pub fn render_carousel_deck(
        &self,
        item: &ContentItem,
        profile: &CategoryProfile,
    ) -> Result<String, AppError> {
        let views: Vec<SlideView> = item.carousel_data.slides.iter().map(SlideView::from).collect();
        self.render_deck(PageFormat::Carousel, item, profile, &views)
    }

    /// Page holding the `index`-th video slide (0-based).
    pub fn render_video_slide(
        &self,
        item: &ContentItem,
        profile: &CategoryProfile,
        index: usize,
    ) -> Result<String, AppError> {
        let slides = video_slides(item)?;
        let slide = slides.get(index).ok_or_else(|| {
            AppError::NotFound(format!(
                "Video slide {} of '{}' not found ({} slides)",
                index,
                item.id,
                slides.len()
            ))
        })?;
        let fragment = self.render_fragment(&slide.into(), index, slides.len(), item, profile)?;
        self.render_page(PageFormat::Video, &item.title, vec![fragment])
    }

    /// Page holding every video slide in order.
    pub fn render_video_deck(
        &self,
        item: &ContentItem,
        profile: &CategoryProfile,
    ) -> Result<String, AppError> {
        let views: Vec<SlideView> = video_slides(item)?.iter().map(SlideView::from).collect();
        self.render_deck(PageFormat::Video, item, profile, &views)
    }

    fn render_deck(
        &self,
        format: PageFormat,
        item: &ContentItem,
        profile: &CategoryProfile,
        views: &[SlideView],
    ) -> Result<String, AppError> {
        let fragments = views
            .iter()
            .enumerate()
            .map(|(i, view)| self.render_fragment(view, i, views.len(), item, profile))
            .collect::<Result<Vec<_>, _>>()?;
        self.render_page(format, &item.title, fragments)
    }

    fn render_fragment(
        &self,
        view: &SlideView,
        index: usize,
        total: usize,
        item: &ContentItem,
        profile: &CategoryProfile,
    ) -> Result<String, AppError> {
        let hashtags = if item.carousel_data.hashtags.is_empty() {
            &profile.hashtags
        } else {
            &item.carousel_data.hashtags
        };

        let mut context = Context::new();
        context.insert("slide", view);
        context.insert("index", &(index + 1));
        context.insert("total", &total);
        context.insert("handle", &profile.handle);
        context.insert("hashtags", hashtags);

        self.tera
            .render(&view.template, &context)
            .map_err(|e| AppError::Internal(format!("Failed to render {}: {e}", view.template)))
    }

    fn render_page(
        &self,
        format: PageFormat,
        title: &str,
        fragments: Vec<String>,
    ) -> Result<String, AppError> {
        let (width, height) = format.size();
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("format", format.name());
        context.insert("width", &width);
        context.insert("height", &height);
        context.insert("slides", &fragments);

        self.tera
            .render(PAGE_TEMPLATE, &context)
            .map_err(|e| AppError::Internal(format!("Failed to render page: {e}")))
    }
}

fn video_slides(item: &ContentItem) -> Result<&[VideoSlide], AppError> {
    item.video_slides
        .as_deref()
        .ok_or_else(|| AppError::NotFound("Video slides have not been generated yet".into()))
}
