//! Structured rich text: plain-text and HTML rendering of body spans

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// Block-level kind of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    Preformatted,
    ListItem,
    OrderedListItem,
}

impl BlockKind {
    /// Map a CMS block type name, unknown names render as paragraphs
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "heading1" => BlockKind::Heading(1),
            "heading2" => BlockKind::Heading(2),
            "heading3" => BlockKind::Heading(3),
            "heading4" => BlockKind::Heading(4),
            "heading5" => BlockKind::Heading(5),
            "heading6" => BlockKind::Heading(6),
            "preformatted" => BlockKind::Preformatted,
            "list-item" => BlockKind::ListItem,
            "o-list-item" => BlockKind::OrderedListItem,
            _ => BlockKind::Paragraph,
        }
    }
}

/// Inline formatting applied to a character range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Strong,
    Em,
    Hyperlink { url: String },
}

impl MarkKind {
    fn open_tag(&self) -> String {
        match self {
            MarkKind::Strong => "<strong>".to_string(),
            MarkKind::Em => "<em>".to_string(),
            MarkKind::Hyperlink { url } => format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                html_escape(url)
            ),
        }
    }

    fn close_tag(&self) -> &'static str {
        match self {
            MarkKind::Strong => "</strong>",
            MarkKind::Em => "</em>",
            MarkKind::Hyperlink { .. } => "</a>",
        }
    }
}

/// A formatted range, offsets count characters of the span text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub start: usize,
    pub end: usize,
    pub kind: MarkKind,
}

/// A single text span of a rich-text body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub kind: BlockKind,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<Mark>,
}

impl TextSpan {
    /// Plain paragraph without inline marks
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// Concatenate span texts into plain text
pub fn as_text(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render spans to HTML, grouping consecutive list items into lists
pub fn as_html(spans: &[TextSpan]) -> String {
    let mut html = String::new();
    let mut open_list: Option<BlockKind> = None;

    for span in spans {
        let list = matches!(span.kind, BlockKind::ListItem | BlockKind::OrderedListItem);

        if open_list.is_some() && open_list != Some(span.kind) {
            html.push_str(list_close(open_list));
            open_list = None;
        }
        if list && open_list.is_none() {
            html.push_str(if span.kind == BlockKind::ListItem {
                "<ul>"
            } else {
                "<ol>"
            });
            open_list = Some(span.kind);
        }

        let inner = render_inline(span);
        match span.kind {
            BlockKind::Paragraph => html.push_str(&format!("<p>{}</p>", inner)),
            BlockKind::Heading(level) => {
                html.push_str(&format!("<h{level}>{}</h{level}>", inner, level = level))
            }
            BlockKind::Preformatted => html.push_str(&format!("<pre>{}</pre>", inner)),
            BlockKind::ListItem | BlockKind::OrderedListItem => {
                html.push_str(&format!("<li>{}</li>", inner))
            }
        }
    }

    html.push_str(list_close(open_list));
    html
}

fn list_close(kind: Option<BlockKind>) -> &'static str {
    match kind {
        Some(BlockKind::ListItem) => "</ul>",
        Some(BlockKind::OrderedListItem) => "</ol>",
        _ => "",
    }
}

/// Render a span's text with its inline marks applied
fn render_inline(span: &TextSpan) -> String {
    let chars: Vec<char> = span.text.chars().collect();
    let len = chars.len();

    let mut marks: Vec<&Mark> = span
        .marks
        .iter()
        .filter(|m| m.start < m.end && m.start < len)
        .collect();
    marks.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(span.text.len());
    let mut open: Vec<&Mark> = Vec::new();
    let mut next = 0;

    for i in 0..=len {
        // Close marks ending here; marks opened inside them are closed and reopened
        while let Some(pos) = open.iter().rposition(|m| m.end.min(len) == i) {
            let inner = open.split_off(pos + 1);
            for m in inner.iter().rev() {
                out.push_str(m.kind.close_tag());
            }
            out.push_str(open[pos].kind.close_tag());
            open.truncate(pos);
            for m in inner {
                if m.end.min(len) != i {
                    out.push_str(&m.kind.open_tag());
                    open.push(m);
                }
            }
        }

        while next < marks.len() && marks[next].start == i {
            out.push_str(&marks[next].kind.open_tag());
            open.push(marks[next]);
            next += 1;
        }

        if let Some(c) = chars.get(i) {
            out.push_str(&html_escape(c.encode_utf8(&mut [0; 4])));
        }
    }

    out
}
