use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use encoding_rs::UTF_16BE;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::ExtractError;
use crate::model::PageText;
use crate::options::PageSpec;
use crate::table_parse::split_line_into_cells;

/// A page whose best candidate scores below this may borrow whole-document
/// text in single-page files.
const WEAK_PAGE_SCORE: i64 = 80;

const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Simple-font encoding names pdf-extract maps; any other name panics.
const PDF_EXTRACT_ENCODINGS: &[&[u8]] = &[
    b"WinAnsiEncoding",
    b"MacRomanEncoding",
    b"MacExpertEncoding",
];

/// Where the PDF bytes come from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PdfSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl PdfSource<'_> {
    fn load(self) -> Result<Document, ExtractError> {
        let document = match self {
            Self::Path(path) => Document::load(path)?,
            Self::Bytes(bytes) => Document::load_mem(bytes)?,
        };
        Ok(document)
    }

    /// pdf-extract panics on some documents lopdf reads fine, so its result
    /// is optional and a panic only drops this candidate.
    fn pdf_extract_text(self) -> Option<String> {
        let outcome = catch_unwind(AssertUnwindSafe(|| match self {
            Self::Path(path) => pdf_extract::extract_text(path),
            Self::Bytes(bytes) => pdf_extract::extract_text_from_mem(bytes),
        }));

        match outcome {
            Ok(Ok(text)) => Some(text),
            Ok(Err(error)) => {
                tracing::debug!(%error, "pdf-extract could not read the document");
                None
            }
            Err(_) => {
                tracing::warn!("pdf-extract panicked; falling back to lopdf text");
                None
            }
        }
    }
}

/// Text pdf-extract produced for the whole document.
enum ExtractedText {
    PerPage(Vec<String>),
    Whole(String),
    Missing,
}

impl ExtractedText {
    fn read(source: PdfSource<'_>, document: &Document, page_count: usize) -> Self {
        // wasm32 aborts on panic, so skip fonts pdf-extract cannot map.
        if cfg!(target_arch = "wasm32") && has_unsupported_font_encoding(document) {
            tracing::warn!("skipping pdf-extract: unsupported font encoding");
            return Self::Missing;
        }

        match source.pdf_extract_text() {
            Some(text) => {
                let pages = split_form_feeds(&text);
                if pages.len() == page_count {
                    Self::PerPage(pages)
                } else {
                    Self::Whole(text)
                }
            }
            None => Self::Missing,
        }
    }
}

fn simple_font_encoding<'a>(document: &'a Document, font: &'a Dictionary) -> Option<&'a [u8]> {
    let is_composite = font
        .get(b"Subtype")
        .and_then(Object::as_name)
        .is_ok_and(|subtype| subtype == b"Type0");
    if is_composite {
        return None;
    }

    match font.get_deref(b"Encoding", document).ok()? {
        Object::Name(name) => Some(name.as_slice()),
        Object::Dictionary(encoding) => encoding
            .get_deref(b"BaseEncoding", document)
            .and_then(Object::as_name)
            .ok(),
        _ => None,
    }
}

fn has_unsupported_font_encoding(document: &Document) -> bool {
    document.get_pages().values().any(|&page_id| {
        document.get_page_fonts(page_id).values().any(|font| {
            simple_font_encoding(document, font)
                .is_some_and(|name| !PDF_EXTRACT_ENCODINGS.iter().any(|known| *known == name))
        })
    })
}

fn split_form_feeds(text: &str) -> Vec<String> {
    let trimmed = text.strip_suffix('\u{000C}').unwrap_or(text);
    trimmed.split('\u{000C}').map(str::to_string).collect()
}

fn looks_garbled(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let suspicious = text
        .chars()
        .filter(|&ch| ch == '\u{FFFD}' || (ch.is_control() && !matches!(ch, '\n' | '\r' | '\t')))
        .count();
    total > 0 && suspicious * 5 > total
}

fn decode_pdf_string(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_garbled(&decoded) {
        return decoded;
    }

    let wide_font = encoding.is_some_and(|name| {
        let lower = name.to_ascii_lowercase();
        lower.starts_with("identity") || lower.contains("ucs2") || lower.contains("utf16")
    });
    if wide_font || bytes.starts_with(&UTF16_BE_BOM) {
        let payload = bytes.strip_prefix(&UTF16_BE_BOM[..]).unwrap_or(bytes);
        let (text, had_errors) = UTF_16BE.decode_without_bom_handling(payload);
        if !had_errors && !text.is_empty() {
            return text.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Rewards lines that split into columns and lines carrying digits.
fn layout_score(text: &str) -> i64 {
    let score = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let columns = if split_line_into_cells(line).len() >= 2 { 50 } else { 0 };
            let digits = if line.bytes().any(|byte| byte.is_ascii_digit()) { 15 } else { 0 };
            1 + columns + digits
        })
        .sum::<i64>();

    if looks_garbled(text) { score - 800 } else { score }
}

fn pick_best(candidates: Vec<String>) -> String {
    candidates
        .into_iter()
        .max_by_key(|text| layout_score(text))
        .unwrap_or_default()
}

#[derive(Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
}

impl LineCollector {
    fn push_operands(&mut self, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    self.current.push_str(&decode_pdf_string(encoding, bytes));
                }
                Object::Array(items) => {
                    self.push_operands(encoding, items);
                    self.current.push(' ');
                }
                // Wide negative kerning inside TJ reads as a gap.
                other => {
                    if other.as_float().is_ok_and(|offset| offset < -100.0) {
                        self.current.push(' ');
                    }
                }
            }
        }
    }

    fn break_line(&mut self) {
        if !self.current.trim().is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.current.clear();
    }

    fn finish(mut self) -> Option<String> {
        self.break_line();
        (!self.lines.is_empty()).then(|| self.lines.join("\n"))
    }
}

fn content_stream_text(document: &Document, page_id: ObjectId) -> Option<String> {
    let content = Content::decode(&document.get_page_content(page_id).ok()?).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut collector = LineCollector::default();
    let mut encoding = None;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => collector.push_operands(encoding, &operation.operands),
            "T*" | "Td" | "TD" | "ET" => collector.break_line(),
            _ => {}
        }
    }
    collector.finish()
}

fn page_text(
    document: &Document,
    page_no: u32,
    page_id: ObjectId,
    extracted: &ExtractedText,
    single_page: bool,
) -> String {
    let mut candidates = Vec::new();
    if let ExtractedText::PerPage(pages) = extracted {
        candidates.extend(pages.get(page_no as usize - 1).cloned());
    }
    candidates.extend(content_stream_text(document, page_id));
    candidates.extend(document.extract_text(&[page_no]).ok());
    candidates.retain(|text| !text.trim().is_empty());

    // Whole-document text only stands in for a page in single-page files,
    // otherwise rows would leak across pages.
    let best_score = candidates.iter().map(|text| layout_score(text)).max();
    if let ExtractedText::Whole(whole) = extracted {
        let weak = best_score.is_none_or(|score| score < WEAK_PAGE_SCORE);
        if single_page && weak && !whole.trim().is_empty() {
            candidates.push(whole.clone());
        }
    }

    pick_best(candidates)
}

/// Reads the text of every page selected by `pages`, keeping the most
/// table-friendly candidate among pdf-extract and the two lopdf paths.
pub(crate) fn read_pdf_pages(
    source: PdfSource<'_>,
    pages: &PageSpec,
) -> Result<Vec<PageText>, ExtractError> {
    let document = source.load()?;
    let page_ids = document.get_pages();
    let selected = pages.resolve(page_ids.len())?;
    if selected.is_empty() {
        return Err(ExtractError::NoPagesSelected);
    }

    let extracted = ExtractedText::read(source, &document, page_ids.len());
    let single_page = page_ids.len() == 1;

    selected
        .into_iter()
        .map(|page_number| {
            let page_id = *page_ids
                .get(&page_number)
                .ok_or(ExtractError::PageOutOfRange {
                    page: page_number,
                    page_count: page_ids.len(),
                })?;
            let text = page_text(&document, page_number, page_id, &extracted, single_page);
            if looks_garbled(&text) {
                tracing::warn!(page = page_number, "page text looks garbled after decoding");
            }
            Ok(PageText { page_number, text })
        })
        .collect()
}
