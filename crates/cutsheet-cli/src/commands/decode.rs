use cutsheet_core::error::CutsheetError;
use cutsheet_core::extraction::pdftotext::{PdftotextExtractor, TextMode};
use cutsheet_core::extraction::{DecodedDocument, PdfExtractor};
use std::path::Path;

use crate::output;

fn decode(pdf_file: &Path, mode: TextMode) -> Result<DecodedDocument, CutsheetError> {
    let file = std::fs::File::open(pdf_file)?;
    let mut reader = std::io::BufReader::new(file);
    PdftotextExtractor::with_mode(mode).extract_reader(&mut reader)
}

pub fn text(pdf_file: &Path, mode: TextMode) -> Result<(), CutsheetError> {
    let document = decode(pdf_file, mode)?;
    print!("{}", document.text);
    Ok(())
}

pub fn fragments(
    pdf_file: &Path,
    mode: TextMode,
    output_format: &str,
) -> Result<(), CutsheetError> {
    let document = decode(pdf_file, mode)?;
    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&document.fragments)?),
        _ => output::table::print_fragments(&document.fragments),
    }
    Ok(())
}
