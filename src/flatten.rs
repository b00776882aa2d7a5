//! Flattens a Document AI response tree into a workflow-friendly record.
//!
//! Every paragraph, block, line and token carries its resolved text instead
//! of a text anchor. Pure functions, no async.
//!
//! Anchor offsets count Unicode scalar values, not UTF-16 code units, so
//! text outside the Basic Multilingual Plane (emoji) slices differently from
//! a JavaScript `substring` over the same offsets.

use serde::Serialize;

use crate::documentai::{Document, Layout, LayoutElement, Page, TextAnchor};

/// Output record for one successfully processed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedDocument {
    pub text: String,
    pub page_count: usize,
    pub pages: Vec<FlattenedPage>,
    pub entities: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub dimension: PageDimension,
    pub detected_languages: Vec<LanguageInfo>,
    pub paragraphs: Vec<TextElement>,
    pub blocks: Vec<TextElement>,
    pub lines: Vec<TextElement>,
    pub tokens: Vec<TokenElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageDimension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextElement {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenElement {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_type: Option<String>,
}

/// Full document text with a char-to-byte offset table, so anchors
/// (counted in characters) slice in constant time.
pub struct DocumentText<'a> {
    text: &'a str,
    offsets: Vec<usize>,
}

impl<'a> DocumentText<'a> {
    pub fn new(text: &'a str) -> Self {
        let offsets = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, offsets }
    }

    fn char_len(&self) -> u64 {
        (self.offsets.len() - 1) as u64
    }

    /// Substring between two character offsets.
    ///
    /// A missing `end` runs to the end of the text, offsets past the end are
    /// clamped, and a reversed range is swapped.
    pub fn substring(&self, start: u64, end: Option<u64>) -> &'a str {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.map_or(len, |e| e.min(len));
        let (from, to) = if start > end { (end, start) } else { (start, end) };
        &self.text[self.offsets[from as usize]..self.offsets[to as usize]]
    }
}

/// Resolve a text anchor against the full document text.
///
/// Only the first segment is honored; its start defaults to 0.
pub fn resolve_text(anchor: Option<&TextAnchor>, text: &DocumentText<'_>) -> String {
    let Some(segment) = anchor.and_then(|a| a.text_segments.first()) else {
        return String::new();
    };
    text.substring(segment.start_index.unwrap_or(0), segment.end_index)
        .to_string()
}

fn layout_text(layout: Option<&Layout>, text: &DocumentText<'_>) -> String {
    resolve_text(layout.and_then(|l| l.text_anchor.as_ref()), text)
}

fn text_elements(elements: &[LayoutElement], text: &DocumentText<'_>) -> Vec<TextElement> {
    elements
        .iter()
        .map(|e| TextElement {
            text: layout_text(e.layout.as_ref(), text),
        })
        .collect()
}

pub fn flatten_page(page: &Page, text: &DocumentText<'_>) -> FlattenedPage {
    FlattenedPage {
        page_number: page.page_number,
        dimension: page
            .dimension
            .as_ref()
            .map(|d| PageDimension {
                width: d.width,
                height: d.height,
            })
            .unwrap_or_default(),
        detected_languages: page
            .detected_languages
            .iter()
            .map(|l| LanguageInfo {
                language_code: l.language_code.clone(),
                confidence: l.confidence,
            })
            .collect(),
        paragraphs: text_elements(&page.paragraphs, text),
        blocks: text_elements(&page.blocks, text),
        lines: text_elements(&page.lines, text),
        tokens: page
            .tokens
            .iter()
            .map(|t| TokenElement {
                text: layout_text(t.layout.as_ref(), text),
                break_type: t.detected_break.as_ref().and_then(|b| b.break_type.clone()),
            })
            .collect(),
    }
}

/// Flatten a whole response, preserving page and entity order.
pub fn flatten_document(document: Document) -> FlattenedDocument {
    let pages = {
        let text = DocumentText::new(&document.text);
        document
            .pages
            .iter()
            .map(|p| flatten_page(p, &text))
            .collect::<Vec<_>>()
    };

    FlattenedDocument {
        page_count: document.pages.len(),
        pages,
        entities: document.entities,
        text: document.text,
    }
}
