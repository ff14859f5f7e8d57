use cutsheet_core::config::{load_options, ParseOptions};
use cutsheet_core::error::CutsheetError;
use cutsheet_core::extraction::pdftotext::{PdftotextExtractor, TextMode};
use cutsheet_core::layout::LayoutPreference;
use std::path::{Path, PathBuf};

use crate::output;
use crate::SectionArg;

pub struct ParseArgs {
    pub input_file: PathBuf,
    pub section: SectionArg,
    pub layout: Option<LayoutPreference>,
    pub no_placeholder: bool,
    pub config: Option<PathBuf>,
    pub output_format: String,
    pub output_file: Option<PathBuf>,
    pub text_mode: TextMode,
}

pub fn run(args: ParseArgs) -> Result<(), CutsheetError> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => ParseOptions::default(),
    };
    if let Some(layout) = args.layout {
        options.layout = layout;
    }
    if args.no_placeholder {
        options.placeholder_fallback = false;
    }

    let parsed = if is_text_input(&args.input_file) {
        let text = std::fs::read_to_string(&args.input_file)?;
        cutsheet_core::parse_text(&text, &options)
    } else {
        let pdf_bytes = std::fs::read(&args.input_file)?;
        let extractor = PdftotextExtractor::with_mode(args.text_mode);
        cutsheet_core::parse_pdf(&pdf_bytes, &extractor, &options)?
    };

    if parsed.used_placeholder {
        eprintln!("warning: no nesting summary found, showing placeholder rows");
    }

    match args.output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = output::json::section_json(&parsed, args.section)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} nest(s), {} part(s), {} material row(s) ({} layout), written to {}",
                parsed.subnest.len(),
                parsed.parts.len(),
                parsed.materials.len(),
                parsed.family,
                path.display()
            );
        }
        None => {
            match args.output_format.as_str() {
                "json" => println!("{}", output::json::section_json(&parsed, args.section)?),
                _ => output::table::print_parsed(&parsed, args.section),
            }
        }
    }

    Ok(())
}

fn is_text_input(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}
