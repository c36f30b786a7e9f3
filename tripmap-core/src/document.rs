//! In-memory model of a rich-text document: body blocks that are either
//! paragraphs or tables, where table cells hold further blocks.
//!
//! [`crate::docx`] fills this model from a `.docx` file; tests build it by
//! hand.

/// A hyperlink run inside a paragraph. Internal (bookmark) links have an
/// empty address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hyperlink {
    pub address: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Display name of the paragraph style, e.g. `heading 2`
    pub style: Option<String>,
    /// All visible text, hyperlink text included
    pub text: String,
    pub hyperlinks: Vec<Hyperlink>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            style: None,
            text: text.into(),
            hyperlinks: Vec::new(),
        }
    }

    pub fn heading(level: u32, text: impl Into<String>) -> Self {
        Self {
            style: Some(format!("Heading {}", level)),
            ..Self::new(text)
        }
    }

    pub fn with_hyperlink(mut self, address: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text.push_str(&text);
        self.hyperlinks.push(Hyperlink {
            address: address.into(),
            text,
        });
        self
    }

    /// Outline level when the style is a `Heading N` style.
    pub fn heading_level(&self) -> Option<u32> {
        heading_level(self.style.as_deref()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// One node visited by the hierarchy walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    Paragraph(&'a Paragraph),
    Table(&'a Table),
    Hyperlink(&'a Hyperlink),
}

/// Parse the level out of a heading style name.
///
/// Accepts both display names (`Heading 2`, `heading 2`) and style ids
/// (`Heading2`); anything else, including `Heading` without a numeral, is not
/// a heading.
pub fn heading_level(style: &str) -> Option<u32> {
    let style = style.trim();
    if !style.to_ascii_lowercase().starts_with("heading") {
        return None;
    }

    let digits_start = style
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    style[digits_start..].parse::<u32>().ok().filter(|level| *level > 0)
}
