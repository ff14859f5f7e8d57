use cutsheet_core::error::CutsheetError;
use cutsheet_core::model::ParsedSheets;

use crate::SectionArg;

pub fn section_json(parsed: &ParsedSheets, section: SectionArg) -> Result<String, CutsheetError> {
    let json = match section {
        SectionArg::All => serde_json::to_string_pretty(parsed)?,
        SectionArg::Subnest => serde_json::to_string_pretty(&parsed.subnest)?,
        SectionArg::Parts => serde_json::to_string_pretty(&parsed.parts)?,
        SectionArg::Material => serde_json::to_string_pretty(&parsed.materials)?,
    };
    Ok(json)
}
