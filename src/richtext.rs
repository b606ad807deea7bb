//! Typed rich-text model and rendering.
//!
//! The store delivers a body as an ordered list of typed spans. The model
//! here is a closed set of span kinds with explicit `Other` fallbacks, so
//! dispatch in the renderer is exhaustive: an unrecognized kind degrades
//! to an escaped plain paragraph instead of being dropped.
//!
//! `to_markup` output is injected into a page without further escaping by
//! the consumer, so every text run goes through maud's escaper before any
//! formatting tags are wrapped around it.

use maud::{html, Markup, PreEscaped};
use thiserror::Error;
use tracing::warn;

use crate::record::{RawInlineMarker, RawSpan};

/// An ordered sequence of typed rich-text spans.
pub type RichText = Vec<Span>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("span of kind '{kind}' is missing its text")]
    MissingText { kind: String },
}

/// One block-level unit of a rich-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    /// Raw text content. `None` is structurally invalid and degrades to a
    /// placeholder block at render time.
    pub text: Option<String>,
    pub markers: Vec<InlineMarker>,
}

/// Block-level span kinds the store produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    Paragraph,
    /// Heading level 1 through 6.
    Heading(u8),
    ListItem,
    OrderedListItem,
    Preformatted,
    /// Anything we don't recognize; renders as a plain paragraph.
    Other(String),
}

impl SpanKind {
    fn label(&self) -> String {
        match self {
            Self::Paragraph => "paragraph".to_string(),
            Self::Heading(level) => format!("heading{level}"),
            Self::ListItem => "list-item".to_string(),
            Self::OrderedListItem => "o-list-item".to_string(),
            Self::Preformatted => "preformatted".to_string(),
            Self::Other(kind) => kind.clone(),
        }
    }
}

/// Inline formatting over a character range of the owning span's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMarker {
    pub start: usize,
    pub end: usize,
    pub kind: InlineKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineKind {
    Strong,
    Em,
    Hyperlink(String),
    /// Unrecognized marker; the text renders unformatted.
    Other(String),
}

impl Span {
    /// Map a raw wire span onto the typed model.
    #[must_use]
    pub fn from_raw(raw: &RawSpan) -> Self {
        let kind = match raw.kind.as_deref() {
            Some("paragraph") | None => SpanKind::Paragraph,
            Some("heading1") => SpanKind::Heading(1),
            Some("heading2") => SpanKind::Heading(2),
            Some("heading3") => SpanKind::Heading(3),
            Some("heading4") => SpanKind::Heading(4),
            Some("heading5") => SpanKind::Heading(5),
            Some("heading6") => SpanKind::Heading(6),
            Some("list-item") => SpanKind::ListItem,
            Some("o-list-item") => SpanKind::OrderedListItem,
            Some("preformatted") => SpanKind::Preformatted,
            Some(other) => SpanKind::Other(other.to_string()),
        };
        Self {
            kind,
            text: raw.text.clone(),
            markers: raw.spans.iter().map(InlineMarker::from_raw).collect(),
        }
    }
}

impl InlineMarker {
    fn from_raw(raw: &RawInlineMarker) -> Self {
        let kind = match raw.kind.as_deref() {
            Some("strong") => InlineKind::Strong,
            Some("em") => InlineKind::Em,
            Some("hyperlink") => InlineKind::Hyperlink(
                raw.data
                    .as_ref()
                    .and_then(|d| d.url.clone())
                    .unwrap_or_default(),
            ),
            other => InlineKind::Other(other.unwrap_or("").to_string()),
        };
        Self {
            start: raw.start,
            end: raw.end,
            kind,
        }
    }
}

/// Convert a raw wire body into the typed model, preserving span order.
#[must_use]
pub fn rich_text_from_raw(raw: &[RawSpan]) -> RichText {
    raw.iter().map(Span::from_raw).collect()
}

/// Concatenate the textual content of every span in order, with no added
/// separators. Used as input to reading-time measurement, not for display.
#[must_use]
pub fn to_plain_text(body: &RichText) -> String {
    let mut out = String::new();
    for span in body {
        if let Some(text) = &span.text {
            out.push_str(text);
        }
    }
    out
}

/// Render a rich-text body to structurally-safe HTML.
///
/// Consecutive list-item spans are grouped into a single `<ul>`/`<ol>`.
/// A structurally invalid span (missing text) degrades to an empty
/// paragraph with a diagnostic rather than failing the whole body.
#[must_use]
pub fn to_markup(body: &RichText) -> String {
    let mut out = String::new();
    let mut idx = 0;

    while idx < body.len() {
        let span = &body[idx];
        match span.kind {
            SpanKind::ListItem | SpanKind::OrderedListItem => {
                let list_kind = span.kind.clone();
                let mut items: Vec<Markup> = Vec::new();
                while idx < body.len() && body[idx].kind == list_kind {
                    items.push(render_block(&body[idx]));
                    idx += 1;
                }
                let list = match list_kind {
                    SpanKind::OrderedListItem => html! { ol { @for item in &items { (item) } } },
                    _ => html! { ul { @for item in &items { (item) } } },
                };
                out.push_str(&list.into_string());
            }
            _ => {
                out.push_str(&render_block(span).into_string());
                idx += 1;
            }
        }
    }

    out
}

/// Render one span, degrading to a placeholder on structural invalidity.
fn render_block(span: &Span) -> Markup {
    match try_render_block(span) {
        Ok(markup) => markup,
        Err(e) => {
            warn!(kind = %span.kind.label(), "degrading invalid rich-text span: {e}");
            html! { p {} }
        }
    }
}

fn try_render_block(span: &Span) -> Result<Markup, RenderError> {
    let text = span.text.as_ref().ok_or_else(|| RenderError::MissingText {
        kind: span.kind.label(),
    })?;
    let inner = render_inline(text, &span.markers);

    Ok(match &span.kind {
        SpanKind::Heading(1) => html! { h1 { (inner) } },
        SpanKind::Heading(2) => html! { h2 { (inner) } },
        SpanKind::Heading(3) => html! { h3 { (inner) } },
        SpanKind::Heading(4) => html! { h4 { (inner) } },
        SpanKind::Heading(5) => html! { h5 { (inner) } },
        SpanKind::Heading(6) => html! { h6 { (inner) } },
        SpanKind::ListItem | SpanKind::OrderedListItem => html! { li { (inner) } },
        SpanKind::Preformatted => html! { pre { (inner) } },
        // Unknown block kinds keep their text as a plain paragraph.
        SpanKind::Paragraph | SpanKind::Heading(_) | SpanKind::Other(_) => {
            html! { p { (inner) } }
        }
    })
}

/// Apply inline markers over the escaped text.
///
/// Marker offsets are character offsets; the end is clamped to the text
/// length and inverted ranges are skipped with a diagnostic. Text is
/// escaped per segment before any tags are wrapped around it.
fn render_inline(text: &str, markers: &[InlineMarker]) -> Markup {
    if markers.is_empty() {
        return html! { (text) };
    }

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let valid: Vec<&InlineMarker> = markers
        .iter()
        .filter(|m| {
            let ok = m.start < m.end && m.start < len;
            if !ok {
                warn!(start = m.start, end = m.end, "skipping inline marker with invalid range");
            }
            ok
        })
        .collect();

    let mut bounds: Vec<usize> = vec![0, len];
    for marker in &valid {
        bounds.push(marker.start);
        bounds.push(marker.end.min(len));
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut out = String::new();
    for window in bounds.windows(2) {
        let (a, b) = (window[0], window[1]);
        let segment: String = chars[a..b].iter().collect();
        let mut piece = html! { (segment) }.into_string();

        // Wrap innermost-first so hyperlinks end up outermost.
        for marker in valid.iter().rev() {
            if marker.start > a || marker.end.min(len) < b {
                continue;
            }
            piece = match &marker.kind {
                InlineKind::Strong => format!("<strong>{piece}</strong>"),
                InlineKind::Em => format!("<em>{piece}</em>"),
                InlineKind::Hyperlink(url) => {
                    let href = html! { (url) }.into_string();
                    format!(r#"<a href="{href}">{piece}</a>"#)
                }
                InlineKind::Other(_) => piece,
            };
        }
        out.push_str(&piece);
    }

    PreEscaped(out)
}
