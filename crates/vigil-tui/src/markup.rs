//! Inline formatting tags.
//!
//! Text may carry xhtml-style tags:
//!
//! ```text
//! <b>text</b>             bold
//! <u>text</u>             underline
//! <h>text</h>             highlight
//! <[color]>text</[color]> color, see NamedColor
//! ```
//!
//! Tags nest and closing isn't enforced. Unrecognized tags (and closing tags
//! nothing opened) are plain text. Nesting a tag inside itself, or one color
//! inside another, has unspecified results.

use ratatui::style::Style;

use crate::palette::{self, NamedColor};

#[derive(Debug, Clone)]
struct Tag {
    open: String,
    close: String,
    style: Style,
}

/// Closed set of formatting tags, built once per palette.
#[derive(Debug, Clone)]
pub struct TagTable {
    tags: Vec<Tag>,
}

impl TagTable {
    pub(crate) fn compile(colors: &[Style; 8]) -> Self {
        let formats = [
            ("b", palette::bold()),
            ("u", palette::underline()),
            ("h", palette::highlight()),
        ];

        let color_formats = NamedColor::ALL
            .into_iter()
            .map(|color| (color.name(), colors[color as usize]));

        let tags = formats
            .into_iter()
            .chain(color_formats)
            .map(|(label, style)| Tag {
                open: format!("<{}>", label),
                close: format!("</{}>", label),
                style,
            })
            .collect();

        Self { tags }
    }

    /// Splits `text` into runs of uniformly styled text.
    pub fn segments<'a>(&'a self, text: &'a str) -> Segments<'a> {
        Segments {
            table: self,
            rest: text,
            active: Vec::new(),
            expected: Vec::new(),
        }
    }
}

/// A run of text and the union of the styles applying to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub style: Style,
}

enum Found<'a> {
    Open(&'a Tag),
    Close(usize),
}

/// Scanner over marked up text. `active` and `expected` always have the same
/// depth: entry `i` of `expected` is the closing tag for style `i`.
pub struct Segments<'a> {
    table: &'a TagTable,
    rest: &'a str,
    active: Vec<Style>,
    expected: Vec<&'a str>,
}

impl<'a> Segments<'a> {
    fn style(&self) -> Style {
        self.active
            .iter()
            .fold(Style::default(), |style, format| style.patch(*format))
    }

    /// Nearest opening tag or expected closing tag, with its byte offset.
    fn next_tag(&self) -> Option<(usize, usize, Found<'a>)> {
        let mut nearest: Option<(usize, usize, Found<'a>)> = None;

        let table = self.table;
        for tag in &table.tags {
            if let Some(index) = self.rest.find(tag.open.as_str())
                && nearest.as_ref().is_none_or(|(best, _, _)| index < *best)
            {
                nearest = Some((index, tag.open.len(), Found::Open(tag)));
            }
        }

        for (depth, close) in self.expected.iter().enumerate() {
            if let Some(index) = self.rest.find(*close)
                && nearest.as_ref().is_none_or(|(best, _, _)| index < *best)
            {
                nearest = Some((index, close.len(), Found::Close(depth)));
            }
        }

        nearest
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        while !self.rest.is_empty() {
            let style = self.style();

            let Some((index, length, found)) = self.next_tag() else {
                let text = std::mem::take(&mut self.rest);
                return Some(Segment { text, style });
            };

            let rest = self.rest;
            let text = &rest[..index];
            self.rest = &rest[index + length..];

            match found {
                Found::Open(tag) => {
                    self.active.push(tag.style);
                    self.expected.push(tag.close.as_str());
                }
                Found::Close(depth) => {
                    self.active.remove(depth);
                    self.expected.remove(depth);
                }
            }

            if !text.is_empty() {
                return Some(Segment { text, style });
            }
        }

        None
    }
}
