use std::io::{BufReader, Cursor, Read};

use async_trait::async_trait;
use cfb::CompoundFile;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::application::ports::{Extractor, StagedFile};
use crate::domain::{AttemptOutcome, Deadline, ExtractionStage};

/// Word documents: `.docx` (OOXML) and legacy `.doc` (Word 97-2003 binary).
#[derive(Default)]
pub struct WordProcessorExtractor;

impl WordProcessorExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read(data: &[u8], extension: &str, deadline: Deadline) -> AttemptOutcome {
        let result = if extension == "doc" {
            read_doc(data, deadline)
        } else {
            read_docx(data, deadline)
        };

        match result {
            Ok(text) if text.trim().is_empty() => AttemptOutcome::InsufficientYield { text },
            Ok(text) => AttemptOutcome::success(text),
            Err(ReadFailure::TimedOut) => AttemptOutcome::TimedOut,
            Err(ReadFailure::Corrupt(reason)) => AttemptOutcome::Corrupt { reason },
        }
    }
}

// XML events between deadline checks.
const DEADLINE_CHECK_EVENTS: usize = 512;

enum ReadFailure {
    TimedOut,
    Corrupt(String),
}

impl From<String> for ReadFailure {
    fn from(reason: String) -> Self {
        Self::Corrupt(reason)
    }
}

impl From<&str> for ReadFailure {
    fn from(reason: &str) -> Self {
        Self::Corrupt(reason.to_string())
    }
}

fn check(deadline: &Deadline) -> Result<(), ReadFailure> {
    if deadline.is_expired() {
        Err(ReadFailure::TimedOut)
    } else {
        Ok(())
    }
}

#[async_trait]
impl Extractor for WordProcessorExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::WordProcessor
    }

    #[tracing::instrument(skip(self, file, deadline), fields(extension = %file.extension))]
    async fn attempt(&self, file: &StagedFile, deadline: Deadline) -> AttemptOutcome {
        let bytes = file.bytes.clone();
        let extension = file.extension.clone();
        tokio::task::spawn_blocking(move || Self::read(&bytes, &extension, deadline))
            .await
            .unwrap_or_else(|e| AttemptOutcome::Corrupt {
                reason: format!("extraction task failed: {e}"),
            })
    }
}

/// Body paragraphs one per line, then table cells one per line.
fn read_docx(data: &[u8], deadline: Deadline) -> Result<String, ReadFailure> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| format!("not a DOCX archive: {e}"))?;
    let document = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {e}"))?;

    let mut reader = Reader::from_reader(BufReader::new(document));
    let mut buf = Vec::with_capacity(1024);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut table_depth = 0usize;
    let mut in_text = false;
    let mut events = 0usize;

    loop {
        if events % DEADLINE_CHECK_EVENTS == 0 {
            check(&deadline)?;
        }
        events += 1;

        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| format!("bad XML text: {e}"))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = std::mem::take(&mut paragraph);
                    if table_depth > 0 {
                        if !cell.is_empty() && !text.trim().is_empty() {
                            cell.push(' ');
                        }
                        cell.push_str(text.trim());
                    } else {
                        paragraphs.push(text);
                    }
                }
                b"w:tc" => {
                    let text = std::mem::take(&mut cell);
                    if !text.trim().is_empty() {
                        cells.push(text);
                    }
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("malformed document.xml: {e}").into()),
            _ => {}
        }
        buf.clear();
    }

    paragraphs.extend(cells);
    Ok(paragraphs.join("\n"))
}

const FIB_FLAGS: usize = 0x000A;
const FIB_CCP_TEXT: usize = 0x004C;
const FIB_FC_CLX: usize = 0x01A2;
const FIB_LCB_CLX: usize = 0x01A6;
const FLAG_WHICH_TABLE: u16 = 0x0200;
const FC_COMPRESSED: u32 = 0x4000_0000;

/// Main document text of a Word 97-2003 file, decoded through its piece table.
fn read_doc(data: &[u8], deadline: Deadline) -> Result<String, ReadFailure> {
    let mut cfb =
        CompoundFile::open(Cursor::new(data)).map_err(|e| format!("not an OLE document: {e}"))?;

    let word_document = read_stream(&mut cfb, "/WordDocument")?;
    if word_document.len() < FIB_LCB_CLX + 4 {
        return Err("WordDocument stream too short".into());
    }

    let flags = read_u16(&word_document, FIB_FLAGS).unwrap_or(0);
    let table_name = if flags & FLAG_WHICH_TABLE != 0 {
        "/1Table"
    } else {
        "/0Table"
    };
    let table = read_stream(&mut cfb, table_name)?;

    let ccp_text = read_u32(&word_document, FIB_CCP_TEXT).unwrap_or(0) as usize;
    let fc_clx = read_u32(&word_document, FIB_FC_CLX).unwrap_or(0) as usize;
    let lcb_clx = read_u32(&word_document, FIB_LCB_CLX).unwrap_or(0) as usize;
    let clx = table
        .get(fc_clx..fc_clx.saturating_add(lcb_clx))
        .ok_or_else(|| "piece table out of range".to_string())?;

    let raw = decode_pieces(clx, &word_document, ccp_text, &deadline)?;
    Ok(clean_doc_text(&raw))
}

fn read_stream<F: Read + std::io::Seek>(
    cfb: &mut CompoundFile<F>,
    name: &str,
) -> Result<Vec<u8>, String> {
    let mut stream = cfb
        .open_stream(name)
        .map_err(|e| format!("missing {name} stream: {e}"))?;
    let mut data = Vec::new();
    stream
        .read_to_end(&mut data)
        .map_err(|e| format!("failed to read {name}: {e}"))?;
    Ok(data)
}

fn decode_pieces(
    clx: &[u8],
    word_document: &[u8],
    ccp_text: usize,
    deadline: &Deadline,
) -> Result<String, ReadFailure> {
    // Skip Prc entries until the Pcdt.
    let mut pos = 0usize;
    while clx.get(pos) == Some(&0x01) {
        let cb = read_u16(clx, pos + 1).ok_or("truncated Prc")? as usize;
        pos += 3 + cb;
    }
    if clx.get(pos) != Some(&0x02) {
        return Err("piece table descriptor not found".into());
    }
    let lcb = read_u32(clx, pos + 1).ok_or("truncated Pcdt")? as usize;
    let plc = clx
        .get(pos + 5..pos + 5 + lcb)
        .ok_or_else(|| "truncated PlcPcd".to_string())?;

    // (n + 1) character positions followed by n 8-byte piece descriptors.
    let pieces = plc.len().saturating_sub(4) / 12;
    let mut text = String::new();
    let mut remaining = if ccp_text == 0 { usize::MAX } else { ccp_text };

    for i in 0..pieces {
        check(deadline)?;
        let cp_start = read_u32(plc, i * 4).ok_or("truncated CP array")? as usize;
        let cp_end = read_u32(plc, (i + 1) * 4).ok_or("truncated CP array")? as usize;
        let count = cp_end.saturating_sub(cp_start).min(remaining);
        if count == 0 {
            continue;
        }

        let pcd = (pieces + 1) * 4 + i * 8;
        let fc = read_u32(plc, pcd + 2).ok_or("truncated piece descriptor")?;

        if fc & FC_COMPRESSED != 0 {
            let offset = ((fc & !FC_COMPRESSED) / 2) as usize;
            let bytes = word_document
                .get(offset..offset + count)
                .ok_or_else(|| "piece out of range".to_string())?;
            let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text.push_str(&decoded);
        } else {
            let offset = fc as usize;
            let bytes = word_document
                .get(offset..offset + count * 2)
                .ok_or_else(|| "piece out of range".to_string())?;
            let (decoded, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
            text.push_str(&decoded);
        }

        remaining -= count;
        if remaining == 0 {
            break;
        }
    }

    Ok(text)
}

/// Maps Word control characters to plain text and drops field codes.
fn clean_doc_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut field_depth = 0usize;
    let mut in_field_code = false;

    for c in raw.chars() {
        match c {
            '\u{13}' => {
                field_depth += 1;
                in_field_code = true;
            }
            '\u{14}' => in_field_code = false,
            '\u{15}' => {
                field_depth = field_depth.saturating_sub(1);
                in_field_code = false;
            }
            _ if in_field_code && field_depth > 0 => {}
            '\r' | '\u{0B}' | '\u{0C}' => out.push('\n'),
            '\u{07}' => out.push('\n'),
            '\t' | '\n' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
