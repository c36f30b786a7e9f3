// Reader for Office Open XML word-processing documents (.docx)
//
// Only the parts needed to rebuild paragraphs, tables, styles and hyperlinks
// are read: word/document.xml, word/styles.xml and the document's
// relationship part.

use crate::document::{Block, Cell, Document, Hyperlink, Paragraph, Row, Table};
use crate::error::DocumentError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

// Subtrees that are not part of the current body text flow. The *PrChange
// elements hold the properties a tracked change replaced.
const SKIPPED_ELEMENTS: [&[u8]; 5] = [b"txbxContent", b"del", b"moveFrom", b"pPrChange", b"rPrChange"];

impl Document {
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(reader)?;

        let document_xml =
            read_part(&mut archive, DOCUMENT_PART)?.ok_or(DocumentError::MissingPart(DOCUMENT_PART))?;
        let styles = match read_part(&mut archive, STYLES_PART)? {
            Some(xml) => parse_styles(&xml)?,
            None => HashMap::new(),
        };
        let relationships = match read_part(&mut archive, RELATIONSHIPS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        debug!(
            "Read document with {} styles and {} relationships",
            styles.len(),
            relationships.len()
        );
        parse_document(&document_xml, &styles, &relationships)
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, DocumentError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            Ok(Some(data))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn xml_error(part: &str, err: impl Display) -> DocumentError {
    DocumentError::Xml {
        part: part.to_string(),
        message: err.to_string(),
    }
}

fn attr(element: &BytesStart<'_>, local_name: &[u8], part: &str) -> Result<Option<String>, DocumentError> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| xml_error(part, e))?;
        if attribute.key.local_name().as_ref() == local_name {
            let value = attribute.unescape_value().map_err(|e| xml_error(part, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Style id -> display name, e.g. `Heading1` -> `heading 1`.
fn parse_styles(xml: &[u8]) -> Result<HashMap<String, String>, DocumentError> {
    let mut reader = Reader::from_reader(xml);
    let mut styles = HashMap::new();
    let mut current_id: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(|e| xml_error(STYLES_PART, e))? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"style" => current_id = attr(&e, b"styleId", STYLES_PART)?,
                b"name" => {
                    if let Some(id) = current_id.as_ref()
                        && let Some(name) = attr(&e, b"val", STYLES_PART)?
                    {
                        styles.insert(id.clone(), name);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"style" => current_id = None,
            _ => {}
        }
    }

    Ok(styles)
}

/// Relationship id -> target, e.g. `rId5` -> `https://goo.gl/maps/...`.
fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, DocumentError> {
    let mut reader = Reader::from_reader(xml);
    let mut relationships = HashMap::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(RELATIONSHIPS_PART, e))?
        {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attr(&e, b"Id", RELATIONSHIPS_PART)?;
                let target = attr(&e, b"Target", RELATIONSHIPS_PART)?;
                if let (Some(id), Some(target)) = (id, target) {
                    relationships.insert(id, target);
                }
            }
            _ => {}
        }
    }

    Ok(relationships)
}

enum Container {
    Body(Vec<Block>),
    Table(Vec<Row>),
    Row(Vec<Cell>),
    Cell(Vec<Block>),
}

/// Incremental tree builder fed by the document part's XML events.
struct DocumentBuilder<'a> {
    styles: &'a HashMap<String, String>,
    relationships: &'a HashMap<String, String>,
    stack: Vec<Container>,
    paragraph: Option<Paragraph>,
    hyperlink: Option<Hyperlink>,
    in_paragraph_properties: bool,
    in_text: bool,
    skip_depth: usize,
}

impl<'a> DocumentBuilder<'a> {
    fn new(styles: &'a HashMap<String, String>, relationships: &'a HashMap<String, String>) -> Self {
        Self {
            styles,
            relationships,
            stack: vec![Container::Body(Vec::new())],
            paragraph: None,
            hyperlink: None,
            in_paragraph_properties: false,
            in_text: false,
            skip_depth: 0,
        }
    }

    fn start(&mut self, element: &BytesStart<'_>) -> Result<(), DocumentError> {
        let name = element.local_name();
        let name = name.as_ref();

        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return Ok(());
        }
        if SKIPPED_ELEMENTS.iter().any(|skipped| *skipped == name) {
            self.skip_depth = 1;
            return Ok(());
        }

        match name {
            b"tbl" => self.stack.push(Container::Table(Vec::new())),
            b"tr" => self.stack.push(Container::Row(Vec::new())),
            b"tc" => self.stack.push(Container::Cell(Vec::new())),
            b"p" => {
                if self.paragraph.is_some() {
                    // A paragraph nested in a paragraph only happens inside
                    // drawing objects we do not model.
                    self.skip_depth = 1;
                } else {
                    self.paragraph = Some(Paragraph::default());
                }
            }
            b"pPr" => self.in_paragraph_properties = true,
            b"hyperlink" if self.paragraph.is_some() => {
                let address = match attr(element, b"id", DOCUMENT_PART)? {
                    Some(id) => self.relationships.get(&id).cloned().unwrap_or_default(),
                    None => String::new(),
                };
                self.hyperlink = Some(Hyperlink {
                    address,
                    text: String::new(),
                });
            }
            b"t" => self.in_text = self.paragraph.is_some() && !self.in_paragraph_properties,
            _ => self.inline(element)?,
        }
        Ok(())
    }

    fn empty(&mut self, element: &BytesStart<'_>) -> Result<(), DocumentError> {
        if self.skip_depth > 0 {
            return Ok(());
        }
        match element.local_name().as_ref() {
            b"p" if self.paragraph.is_none() => self.push_block(Block::Paragraph(Paragraph::default())),
            _ => self.inline(element),
        }
    }

    /// Elements that matter the same way whether written empty or not.
    fn inline(&mut self, element: &BytesStart<'_>) -> Result<(), DocumentError> {
        if self.paragraph.is_none() {
            return Ok(());
        }

        match element.local_name().as_ref() {
            b"pStyle" if self.in_paragraph_properties => {
                if let Some(id) = attr(element, b"val", DOCUMENT_PART)? {
                    let name = self.styles.get(&id).cloned().unwrap_or(id);
                    if let Some(paragraph) = self.paragraph.as_mut() {
                        paragraph.style = Some(name);
                    }
                }
            }
            b"tab" if !self.in_paragraph_properties => self.push_text("\t"),
            b"br" | b"cr" if !self.in_paragraph_properties => self.push_text("\n"),
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local_name: &[u8]) -> Result<(), DocumentError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }

        match local_name {
            b"t" => self.in_text = false,
            b"pPr" => self.in_paragraph_properties = false,
            b"hyperlink" => {
                if let (Some(hyperlink), Some(paragraph)) = (self.hyperlink.take(), self.paragraph.as_mut()) {
                    paragraph.hyperlinks.push(hyperlink);
                }
            }
            b"p" => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.hyperlink = None;
                    self.in_paragraph_properties = false;
                    self.push_block(Block::Paragraph(paragraph))?;
                }
            }
            b"tc" => match self.stack.pop() {
                Some(Container::Cell(blocks)) => match self.stack.last_mut() {
                    Some(Container::Row(cells)) => cells.push(Cell { blocks }),
                    _ => return Err(xml_error(DOCUMENT_PART, "table cell outside of a row")),
                },
                _ => return Err(xml_error(DOCUMENT_PART, "unbalanced table cell")),
            },
            b"tr" => match self.stack.pop() {
                Some(Container::Row(cells)) => match self.stack.last_mut() {
                    Some(Container::Table(rows)) => rows.push(Row { cells }),
                    _ => return Err(xml_error(DOCUMENT_PART, "table row outside of a table")),
                },
                _ => return Err(xml_error(DOCUMENT_PART, "unbalanced table row")),
            },
            b"tbl" => match self.stack.pop() {
                Some(Container::Table(rows)) => self.push_block(Block::Table(Table { rows }))?,
                _ => return Err(xml_error(DOCUMENT_PART, "unbalanced table")),
            },
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.skip_depth == 0 && self.in_text {
            self.push_text(text);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.text.push_str(text);
        }
        if let Some(hyperlink) = self.hyperlink.as_mut() {
            hyperlink.text.push_str(text);
        }
    }

    fn push_block(&mut self, block: Block) -> Result<(), DocumentError> {
        match self.stack.last_mut() {
            Some(Container::Body(blocks)) | Some(Container::Cell(blocks)) => {
                blocks.push(block);
                Ok(())
            }
            _ => Err(xml_error(DOCUMENT_PART, "content outside of body or table cell")),
        }
    }

    fn finish(mut self) -> Result<Document, DocumentError> {
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(Container::Body(blocks)), true) => Ok(Document { blocks }),
            _ => Err(xml_error(DOCUMENT_PART, "document ended inside a table")),
        }
    }
}

fn parse_document(
    xml: &[u8],
    styles: &HashMap<String, String>,
    relationships: &HashMap<String, String>,
) -> Result<Document, DocumentError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut builder = DocumentBuilder::new(styles, relationships);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(|e| xml_error(DOCUMENT_PART, e))? {
            Event::Eof => break,
            Event::Start(e) => builder.start(&e)?,
            Event::Empty(e) => builder.empty(&e)?,
            Event::End(e) => builder.end(e.local_name().as_ref())?,
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| xml_error(DOCUMENT_PART, e))?;
                builder.text(&text);
            }
            _ => {}
        }
    }

    builder.finish()
}
