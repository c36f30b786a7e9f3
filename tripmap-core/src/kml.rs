//! KML 2.2 output.
//!
//! The layout follows what the mapping application's importer expects:
//! styles are declared once at document level with the `icon-<code>` ids it
//! recognizes, points are filed into one folder per category and routes go
//! into a separate folder as `LineString` placemarks.

use crate::builder::MapContent;
use crate::category::Icon;
use crate::error::OutputError;
use crate::model::{Coordinate, Line, Point};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const ICON_HREF: &str = "https://www.gstatic.com/mapspro/images/stock/503-wht-blank_maps.png";
pub const LINES_FOLDER: &str = "From document";
const HEADING_SEPARATOR: &str = " / ";

type KmlWriter<W> = Writer<W>;

fn start<W: Write>(xml: &mut KmlWriter<W>, name: &str) -> Result<(), OutputError> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(xml: &mut KmlWriter<W>, name: &str) -> Result<(), OutputError> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(xml: &mut KmlWriter<W>, name: &str, text: &str) -> Result<(), OutputError> {
    start(xml, name)?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    end(xml, name)
}

fn coordinate_text(coordinate: &Coordinate) -> String {
    format!("{},{},0", coordinate.lon(), coordinate.lat())
}

fn write_style<W: Write>(xml: &mut KmlWriter<W>, icon: &Icon) -> Result<(), OutputError> {
    let mut style = BytesStart::new("Style");
    style.push_attribute(("id", icon.style_id().as_str()));
    xml.write_event(Event::Start(style))?;

    start(xml, "IconStyle")?;
    text_element(xml, "color", &icon.kml_color())?;
    start(xml, "Icon")?;
    text_element(xml, "href", ICON_HREF)?;
    end(xml, "Icon")?;
    end(xml, "IconStyle")?;

    end(xml, "Style")
}

fn write_point<W: Write>(xml: &mut KmlWriter<W>, point: &Point, icon: &Icon) -> Result<(), OutputError> {
    start(xml, "Placemark")?;
    text_element(xml, "name", point.name())?;
    if !point.headings().is_empty() {
        text_element(xml, "description", &point.headings().join(HEADING_SEPARATOR))?;
    }
    text_element(xml, "styleUrl", &format!("#{}", icon.style_id()))?;
    start(xml, "Point")?;
    text_element(xml, "coordinates", &coordinate_text(&point.coordinate()))?;
    end(xml, "Point")?;
    end(xml, "Placemark")
}

fn write_line<W: Write>(xml: &mut KmlWriter<W>, line: &Line) -> Result<(), OutputError> {
    let coordinates = line
        .coordinates()
        .iter()
        .map(coordinate_text)
        .collect::<Vec<_>>()
        .join(" ");

    start(xml, "Placemark")?;
    text_element(xml, "name", line.name())?;
    if !line.headings().is_empty() {
        text_element(xml, "description", &line.headings().join(HEADING_SEPARATOR))?;
    }
    start(xml, "LineString")?;
    text_element(xml, "tessellate", "1")?;
    text_element(xml, "coordinates", &coordinates)?;
    end(xml, "LineString")?;
    end(xml, "Placemark")
}

/// Write `content` as a KML document named `title`.
pub fn write_kml<W: Write>(content: &MapContent, title: &str, writer: W) -> Result<(), OutputError> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("kml");
    root.push_attribute(("xmlns", KML_NAMESPACE));
    xml.write_event(Event::Start(root))?;
    start(&mut xml, "Document")?;
    text_element(&mut xml, "name", title)?;

    let groups = content.by_category();
    for (category, _) in &groups {
        write_style(&mut xml, &category.icon())?;
    }

    for (category, points) in &groups {
        let icon = category.icon();
        start(&mut xml, "Folder")?;
        text_element(&mut xml, "name", category.name())?;
        for point in points {
            write_point(&mut xml, point, &icon)?;
        }
        end(&mut xml, "Folder")?;
    }

    if !content.lines.is_empty() {
        start(&mut xml, "Folder")?;
        text_element(&mut xml, "name", LINES_FOLDER)?;
        for line in &content.lines {
            write_line(&mut xml, line)?;
        }
        end(&mut xml, "Folder")?;
    }

    end(&mut xml, "Document")?;
    end(&mut xml, "kml")?;
    xml.into_inner().flush()?;
    Ok(())
}

/// Write `content` to `path`, replacing any existing file.
pub fn save_kml(content: &MapContent, title: &str, path: &Path) -> Result<(), OutputError> {
    let file = File::create(path)?;
    write_kml(content, title, BufWriter::new(file))?;
    info!("Wrote {}", path.display());
    Ok(())
}
