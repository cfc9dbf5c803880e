use crate::models::chat::Display;
use log::warn;
use pulldown_cmark::{ html, Options, Parser };
use std::panic::{ self, AssertUnwindSafe };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("markdown renderer panicked")]
    Panicked,
    #[error("render failed: {0}")]
    Failed(String),
}

/// Render-safe transform: raw assistant text in, sanitized markup out.
pub trait Renderer: Send + Sync {
    fn render(&self, text: &str) -> Result<String, RenderError>;
}

/// CommonMark to HTML, then restricted to the html-safe profile.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    fn to_html(text: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(text, options);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, text: &str) -> Result<String, RenderError> {
        panic::catch_unwind(AssertUnwindSafe(|| ammonia::clean(&Self::to_html(text))))
            .map_err(|_| RenderError::Panicked)
    }
}

/// Renders assistant text, falling back to the raw text when the renderer fails.
pub fn render_or_raw(renderer: &dyn Renderer, text: &str) -> Display {
    match renderer.render(text) {
        Ok(markup) => Display::Markup(markup),
        Err(e) => {
            warn!("Falling back to raw text: {}", e);
            Display::Plain(text.to_string())
        }
    }
}
