// Document-order traversal that tracks which headings each item sits under

use crate::document::{Block, Content, Document, Paragraph, Table};
use crate::model::Link;

/// Open headings, outermost at the bottom. Levels strictly increase from
/// bottom to top.
#[derive(Debug, Default, Clone)]
pub struct HeadingStack {
    entries: Vec<(u32, String)>,
}

impl HeadingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a heading of `level`, closing every open heading at that level or
    /// deeper first.
    pub fn enter(&mut self, level: u32, text: impl Into<String>) {
        while self.entries.last().is_some_and(|(open, _)| *open >= level) {
            self.entries.pop();
        }
        self.entries.push((level, text.into()));
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

/// A visited content item and the headings above it, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated<'a> {
    pub content: Content<'a>,
    pub headings: Vec<String>,
}

/// Every table, paragraph and hyperlink of `document`, in document order.
pub fn walk(document: &Document) -> Vec<Annotated<'_>> {
    let mut stack = HeadingStack::new();
    let mut out = Vec::new();
    walk_blocks(&document.blocks, &mut stack, &mut out);
    out
}

fn walk_blocks<'a>(blocks: &'a [Block], stack: &mut HeadingStack, out: &mut Vec<Annotated<'a>>) {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => walk_paragraph(paragraph, stack, out),
            Block::Table(table) => walk_table(table, stack, out),
        }
    }
}

fn walk_paragraph<'a>(paragraph: &'a Paragraph, stack: &mut HeadingStack, out: &mut Vec<Annotated<'a>>) {
    if let Some(level) = paragraph.heading_level() {
        stack.enter(level, paragraph.text.as_str());
    }

    let headings = stack.snapshot();
    out.push(Annotated {
        content: Content::Paragraph(paragraph),
        headings: headings.clone(),
    });
    for hyperlink in &paragraph.hyperlinks {
        out.push(Annotated {
            content: Content::Hyperlink(hyperlink),
            headings: headings.clone(),
        });
    }
}

// Headings inside a cell stay open after the table ends, just as they would
// if the same paragraphs followed it in the body.
fn walk_table<'a>(table: &'a Table, stack: &mut HeadingStack, out: &mut Vec<Annotated<'a>>) {
    out.push(Annotated {
        content: Content::Table(table),
        headings: stack.snapshot(),
    });
    for row in &table.rows {
        for cell in &row.cells {
            walk_blocks(&cell.blocks, stack, out);
        }
    }
}

/// Every hyperlink with its heading path.
pub fn iter_links_with_headings(document: &Document) -> Vec<Link> {
    walk(document)
        .into_iter()
        .filter_map(|item| match item.content {
            Content::Hyperlink(hyperlink) => Some(Link {
                address: hyperlink.address.clone(),
                text: hyperlink.text.clone(),
                headings: item.headings,
            }),
            Content::Paragraph(_) | Content::Table(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_pops_same_and_deeper_levels() {
        let mut stack = HeadingStack::new();
        stack.enter(1, "Japan");
        stack.enter(2, "Kyoto");
        stack.enter(3, "Day 1");
        assert_eq!(stack.snapshot(), vec!["Japan", "Kyoto", "Day 1"]);

        stack.enter(2, "Osaka");
        assert_eq!(stack.snapshot(), vec!["Japan", "Osaka"]);

        stack.enter(1, "Korea");
        assert_eq!(stack.snapshot(), vec!["Korea"]);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_stack_allows_skipped_levels() {
        let mut stack = HeadingStack::new();
        stack.enter(1, "A");
        stack.enter(3, "C");
        stack.enter(2, "B");
        assert_eq!(stack.snapshot(), vec!["A", "B"]);
    }

    #[test]
    fn test_heading_paragraph_sees_itself() {
        let doc = Document {
            blocks: vec![Block::Paragraph(
                Paragraph::heading(1, "").with_hyperlink("https://goo.gl/maps/x", "Castle"),
            )],
        };
        let items = walk(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].headings, vec!["Castle"]);
        assert_eq!(items[1].headings, vec!["Castle"]);
    }

    #[test]
    fn test_table_is_emitted_before_its_cells() {
        let doc = Document {
            blocks: vec![Block::Table(Table {
                rows: vec![crate::document::Row {
                    cells: vec![crate::document::Cell {
                        blocks: vec![Block::Paragraph(Paragraph::new("inside"))],
                    }],
                }],
            })],
        };
        let items = walk(&doc);
        assert!(matches!(items[0].content, Content::Table(_)));
        assert!(matches!(items[1].content, Content::Paragraph(p) if p.text == "inside"));
    }
}
