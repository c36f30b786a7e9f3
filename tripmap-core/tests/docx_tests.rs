use std::io::{Cursor, Write};
use tripmap_core::document::{Block, Document};
use tripmap_core::error::DocumentError;
use tripmap_core::hierarchy::iter_links_with_headings;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const NAMESPACES: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Titre3"><w:name w:val="heading 3"/></w:style>
</w:styles>"#;

fn relationships(targets: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, target) in targets {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
            id,
            target.replace('&', "&amp;")
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn docx(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}<w:sectPr/></w:body></w:document>"#,
        NAMESPACES, body
    )
}

fn heading(style_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        style_id, text
    )
}

fn link_paragraph(rel_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">See </w:t></w:r><w:hyperlink r:id="{}" w:history="1"><w:r><w:rPr><w:rStyle w:val="Hyperlink"/></w:rPr><w:t>{}</w:t></w:r></w:hyperlink></w:p>"#,
        rel_id, text
    )
}

fn read(parts: &[(&str, &str)]) -> Result<Document, DocumentError> {
    Document::from_reader(Cursor::new(docx(parts)))
}

#[test]
fn test_links_carry_their_heading_path() {
    let body = [
        heading("Heading1", "Japan"),
        heading("Heading2", "Kyoto"),
        link_paragraph("rId10", "Fushimi Inari"),
        heading("Titre3", "Bookings"),
        link_paragraph("rId11", "Hotel Granvia"),
        heading("Heading2", "Himeji"),
        link_paragraph("rId12", "Himeji Castle"),
    ]
    .concat();
    let rels = relationships(&[
        ("rId10", "https://goo.gl/maps/inari"),
        ("rId11", "https://goo.gl/maps/granvia"),
        ("rId12", "https://www.google.com/maps/place/Himeji+Castle/@1,2,17z/data=!3d34.839449!4d134.6939047?a=1&b=2"),
    ]);

    let document = read(&[
        ("word/document.xml", &document_xml(&body)),
        ("word/styles.xml", STYLES),
        ("word/_rels/document.xml.rels", &rels),
    ])
    .unwrap();

    let links = iter_links_with_headings(&document);
    assert_eq!(links.len(), 3);

    assert_eq!(links[0].text, "Fushimi Inari");
    assert_eq!(links[0].headings, vec!["Japan", "Kyoto"]);

    assert_eq!(links[1].address, "https://goo.gl/maps/granvia");
    assert_eq!(links[1].headings, vec!["Japan", "Kyoto", "Bookings"]);

    assert_eq!(links[2].headings, vec!["Japan", "Himeji"]);
    assert!(links[2].address.ends_with("?a=1&b=2"));
}

#[test]
fn test_headings_inside_tables_are_tracked() {
    let body = format!(
        "{}<w:tbl><w:tblPr/><w:tr><w:tc><w:tcPr/>{}{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl>{}",
        heading("Heading1", "Itinerary"),
        heading("Heading2", "Day 1"),
        link_paragraph("rId1", "Temple"),
        link_paragraph("rId2", "Garden"),
        link_paragraph("rId3", "Station"),
    );
    let rels = relationships(&[
        ("rId1", "https://goo.gl/maps/1"),
        ("rId2", "https://goo.gl/maps/2"),
        ("rId3", "https://goo.gl/maps/3"),
    ]);

    let document = read(&[
        ("word/document.xml", &document_xml(&body)),
        ("word/styles.xml", STYLES),
        ("word/_rels/document.xml.rels", &rels),
    ])
    .unwrap();

    assert!(matches!(document.blocks[1], Block::Table(_)));
    let links = iter_links_with_headings(&document);
    let headings: Vec<Vec<String>> = links.into_iter().map(|l| l.headings).collect();
    assert_eq!(
        headings,
        vec![
            vec!["Itinerary", "Day 1"],
            vec!["Itinerary", "Day 1"],
            vec!["Itinerary", "Day 1"],
        ]
    );
}

#[test]
fn test_optional_parts_may_be_missing() {
    let body = [heading("Heading1", "Lisbon"), link_paragraph("rId1", "Tram 28")].concat();
    let document = read(&[("word/document.xml", &document_xml(&body))]).unwrap();

    // Without styles.xml the style id itself is used, which still reads as a heading.
    let links = iter_links_with_headings(&document);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].headings, vec!["Lisbon"]);
    assert_eq!(links[0].address, "");
}

#[test]
fn test_missing_main_part() {
    let err = read(&[("word/styles.xml", STYLES)]).unwrap_err();
    assert!(matches!(err, DocumentError::MissingPart("word/document.xml")));
}

#[test]
fn test_not_a_zip_archive() {
    let err = Document::from_reader(Cursor::new(b"plain text, not a document".to_vec())).unwrap_err();
    assert!(matches!(err, DocumentError::Zip(_)));
}

#[test]
fn test_malformed_xml() {
    let err = read(&[(
        "word/document.xml",
        "<w:document><w:body><w:p></w:body></w:document>",
    )])
    .unwrap_err();
    assert!(matches!(err, DocumentError::Xml { .. }));
}

#[test]
fn test_open_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("trip.docx");
    let body = link_paragraph("rId1", "Castle");
    let rels = relationships(&[("rId1", "https://goo.gl/maps/castle")]);
    std::fs::write(
        &path,
        docx(&[
            ("word/document.xml", &document_xml(&body)),
            ("word/_rels/document.xml.rels", &rels),
        ]),
    )
    .unwrap();

    let document = Document::open(&path).unwrap();
    let links = iter_links_with_headings(&document);
    assert_eq!(links[0].address, "https://goo.gl/maps/castle");
    assert!(Document::open(&dir.path().join("missing.docx")).is_err());
}
