use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::document::{ExtractedDocument, ExtractionError};
use crate::resume::HyperlinkHint;

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

/// Extracts paragraph text (body and table cells) and external hyperlinks.
pub fn extract_docx(bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let document_xml =
        read_part(&mut archive, DOCUMENT_PART)?.ok_or(ExtractionError::MissingPart(DOCUMENT_PART))?;
    let link_targets = match read_part(&mut archive, RELATIONSHIPS_PART)? {
        Some(rels) => parse_hyperlink_targets(&rels)?,
        None => HashMap::new(),
    };

    let extracted = parse_document(&document_xml, &link_targets)?;
    debug!(
        text_len = extracted.text.len(),
        hints = extracted.hints.len(),
        "extracted DOCX text"
    );
    Ok(extracted)
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

fn xml_error(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Xml(e.to_string())
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, ExtractionError> {
    match element.try_get_attribute(key).map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

/// Maps relationship ids to external hyperlink targets.
fn parse_hyperlink_targets(rels_xml: &str) -> Result<HashMap<String, String>, ExtractionError> {
    let mut reader = Reader::from_str(rels_xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let is_hyperlink = attribute(&e, "Type")?
                    .is_some_and(|t| t.ends_with("/hyperlink"));
                if !is_hyperlink {
                    continue;
                }
                if let (Some(id), Some(target)) = (attribute(&e, "Id")?, attribute(&e, "Target")?) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

/// Text of the hyperlink currently being read.
struct OpenLink {
    target: Option<String>,
    text: String,
}

fn parse_document(
    document_xml: &str,
    link_targets: &HashMap<String, String>,
) -> Result<ExtractedDocument, ExtractionError> {
    let mut reader = Reader::from_str(document_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut hints: Vec<HyperlinkHint> = Vec::new();
    let mut paragraph = String::new();
    let mut link: Option<OpenLink> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                b"hyperlink" => {
                    let target = attribute(&e, "r:id")?.and_then(|id| link_targets.get(&id).cloned());
                    link = Some(OpenLink {
                        target,
                        text: String::new(),
                    });
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(xml_error)?;
                paragraph.push_str(&text);
                if let Some(open) = link.as_mut() {
                    open.text.push_str(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let line = paragraph.trim();
                    if !line.is_empty() {
                        paragraphs.push(line.to_string());
                    }
                    paragraph.clear();
                }
                b"hyperlink" => {
                    if let Some(OpenLink {
                        target: Some(url),
                        text,
                    }) = link.take()
                    {
                        hints.push(HyperlinkHint::new(text.trim(), url));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ExtractedDocument {
        text: paragraphs.join("\n"),
        hints,
    })
}
