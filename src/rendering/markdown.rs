use pulldown_cmark::{html, Options, Parser};

/// Render slide text written in Markdown to sanitized HTML.
///
/// Operators paste text from anywhere, so the output goes through ammonia
/// before it reaches a page.
pub fn render_markdown(raw: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_SMART_PUNCTUATION;

    let parser = Parser::new_ext(raw, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    ammonia::clean(&html_output)
}

/// Like [`render_markdown`], without the paragraph wrapper around a single
/// line of text.
pub fn render_inline(raw: &str) -> String {
    let rendered = render_markdown(raw);
    let trimmed = rendered.trim();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => trimmed.to_string(),
    }
}
