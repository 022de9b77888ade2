//! DOCX paragraph text.
//!
//! DOCX files are ZIP archives; the body lives in `word/document.xml` as
//! `w:p` paragraphs made of `w:r` runs holding `w:t` text.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use crate::cv::errors::CvError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Extract the visible text of every paragraph, in document order.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, CvError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CvError::Docx(format!("failed to open archive: {e}")))?;

    let xml = read_document_xml(&mut archive)?;
    parse_paragraphs(&xml)
}

fn read_document_xml<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, CvError> {
    let mut file = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| CvError::Docx(format!("missing {DOCUMENT_XML}: {e}")))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| CvError::Docx(format!("failed to read {DOCUMENT_XML}: {e}")))?;
    Ok(content)
}

fn parse_paragraphs(xml: &str) -> Result<Vec<String>, CvError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    // Text boxes nest whole paragraphs inside a run, so open paragraphs stack.
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => push_text(&mut open, "\t"),
                b"br" | b"cr" => push_text(&mut open, "\n"),
                // self-closing paragraph
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.extend(open.pop()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| CvError::Docx(format!("bad text node: {err}")))?;
                    push_text(&mut open, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CvError::Docx(format!(
                    "xml error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn push_text(open: &mut [String], text: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(text);
    }
}
