pub mod pdftotext;

use crate::error::CutsheetError;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A line of text with the page and vertical offset it was rendered at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFragment {
    pub text: String,
    /// 1-based page number.
    pub page: u32,
    /// Distance from the top of the page, in PDF points.
    pub y_position: f32,
    pub page_height: f32,
}

/// Anything that can hand the parsers a flat text and its position fragments.
pub trait DocumentSource {
    /// The whole document text, all pages, line-delimited.
    fn flat_text(&self) -> &str;

    /// Fragments in reading order: page ascending, top to bottom.
    fn position_fragments(&self) -> &[PositionFragment];
}

/// Output of a decoder run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedDocument {
    pub text: String,
    pub fragments: Vec<PositionFragment>,
}

impl DecodedDocument {
    /// A document with text only; every row will come back without a location.
    pub fn from_text(text: impl Into<String>) -> Self {
        DecodedDocument {
            text: text.into(),
            fragments: Vec::new(),
        }
    }
}

impl DocumentSource for DecodedDocument {
    fn flat_text(&self) -> &str {
        &self.text
    }

    fn position_fragments(&self) -> &[PositionFragment] {
        &self.fragments
    }
}

/// Trait for PDF decoding backends.
pub trait PdfExtractor: Send + Sync {
    /// Decode PDF bytes into flat text plus position fragments.
    fn extract(&self, pdf_bytes: &[u8]) -> Result<DecodedDocument, CutsheetError>;

    /// Decode from an already-open byte stream.
    fn extract_reader(&self, reader: &mut dyn Read) -> Result<DecodedDocument, CutsheetError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.extract(&bytes)
    }

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
