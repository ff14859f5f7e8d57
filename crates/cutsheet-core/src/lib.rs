pub mod config;
pub mod correlate;
pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod parsing;

use config::ParseOptions;
use correlate::{locate_part_rows, locate_subnest_rows, RowPositionIndex};
use error::CutsheetError;
use extraction::{DecodedDocument, DocumentSource, PdfExtractor};
use layout::{select_materials, select_parts, select_subnest};
use model::{MaterialRow, ParsedSheets, PartRow, SubNestRow};
use std::io::Read;

/// Main API entry point: decode a PDF and extract every table from it.
///
/// Decoding failures are returned as errors. Everything after decoding is
/// best-effort: unrecognized content yields empty (or placeholder) lists.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    options: &ParseOptions,
) -> Result<ParsedSheets, CutsheetError> {
    let document = extractor.extract(pdf_bytes)?;
    log::info!(
        "decoded document with {}: {} chars",
        extractor.backend_name(),
        document.text.len()
    );
    Ok(parse_document(&document, options))
}

/// Same as [`parse_pdf`], reading the PDF from an open stream.
pub fn parse_reader(
    reader: &mut dyn Read,
    extractor: &dyn PdfExtractor,
    options: &ParseOptions,
) -> Result<ParsedSheets, CutsheetError> {
    let document = extractor.extract_reader(reader)?;
    Ok(parse_document(&document, options))
}

/// Extract all three tables from an already decoded document.
pub fn parse_document(source: &dyn DocumentSource, options: &ParseOptions) -> ParsedSheets {
    let text = source.flat_text();
    let index = position_index(source);

    let selection = select_subnest(text, options);
    let subnest = if selection.used_placeholder {
        selection.rows
    } else {
        locate_subnest_rows(selection.rows, &index, selection.family, text)
    };

    let (parts, parts_family) = select_parts(text, options);
    let parts = locate_part_rows(parts, &index, parts_family);

    let (materials, _) = select_materials(text, options);

    ParsedSheets {
        family: selection.family,
        subnest,
        parts,
        materials,
        used_placeholder: selection.used_placeholder,
    }
}

/// Nesting-summary rows only, located in the document.
pub fn parse_subnest(source: &dyn DocumentSource, options: &ParseOptions) -> Vec<SubNestRow> {
    let text = source.flat_text();
    let selection = select_subnest(text, options);
    if selection.used_placeholder {
        return selection.rows;
    }
    let index = position_index(source);
    locate_subnest_rows(selection.rows, &index, selection.family, text)
}

/// Part rows only, located in the document.
pub fn parse_parts(source: &dyn DocumentSource, options: &ParseOptions) -> Vec<PartRow> {
    let (rows, family) = select_parts(source.flat_text(), options);
    let index = position_index(source);
    locate_part_rows(rows, &index, family)
}

/// Raw-material rows only. These carry no position.
pub fn parse_materials(source: &dyn DocumentSource, options: &ParseOptions) -> Vec<MaterialRow> {
    select_materials(source.flat_text(), options).0
}

/// Parse text that was decoded elsewhere and has no positions.
pub fn parse_text(text: &str, options: &ParseOptions) -> ParsedSheets {
    parse_document(&DecodedDocument::from_text(text), options)
}

fn position_index(source: &dyn DocumentSource) -> RowPositionIndex<'_> {
    let index = RowPositionIndex::new(source.position_fragments());
    if index.is_empty() {
        log::debug!("no position fragments, rows stay unlocated");
    } else {
        log::debug!("correlating rows against {} fragment(s)", index.len());
    }
    index
}
