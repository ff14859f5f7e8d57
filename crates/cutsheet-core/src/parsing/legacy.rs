//! Line-oriented state machine for the legacy tabular cut report.
//!
//! The report has three sections, "SubNest", "Parts" and "Material Data",
//! each rendered as a table whose cells the text extractor emits as loose
//! lines. Every section gets its own forward pass over the same text: scan
//! until the section heading, then consume rows until the section's exit
//! line. Passes never backtrack and never look for a second instance of a
//! section.

use super::values::{is_digits, normalize_ws, parse_float_safe, parse_int_safe, tokenize};
use super::LayoutParser;
use crate::config::ParseOptions;
use crate::model::{LayoutFamily, MaterialRow, PartRow, SubNestRow};

/// Current mode of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    SubNest,
    Parts,
    MaterialData,
}

const SUBNEST_HEADER_PREFIXES: &[&str] = &["no.", "no "];
const SUBNEST_HEADER_WORDS: &[&str] = &[
    "size x", "size y", "material", "thk.", "time per", "total", "nc file", "area", "eff. %",
];
const SUBNEST_SUMMARY_PREFIXES: &[&str] = &[
    "customer:",
    "sheet qty.",
    "placed part qty",
    "required part qty",
    "notes:",
    "metaspark engineers",
];

const PARTS_HEADER_WORDS: &[&str] = &["part name", "preview", "req.", "cutting"];

const MATERIAL_HEADER_PREFIXES: &[&str] = &["sheet id", "sheet", "qty", "notes"];
const MATERIAL_HEADER_WORDS: &[&str] = &["thickness", "size x", "size y"];

/// Minimum token counts for a data line to become a row.
const SUBNEST_MIN_TOKENS: usize = 9;
const PARTS_MIN_TOKENS: usize = 8;
const MATERIAL_MIN_TOKENS: usize = 5;

impl Section {
    /// `line` is lowercased and whitespace-normalized.
    fn opens(self, line: &str) -> bool {
        match self {
            Section::None => false,
            Section::SubNest => line.starts_with("subnest"),
            Section::Parts => line == "parts",
            Section::MaterialData => line.contains("material data"),
        }
    }

    /// `"note"` ends Material Data; the `"notes"` column caption does not.
    fn closes(self, line: &str) -> bool {
        match self {
            Section::None => false,
            Section::SubNest => line == "parts" || line.starts_with("material data"),
            Section::Parts => line.starts_with("material data"),
            Section::MaterialData => line == "note",
        }
    }

    fn is_header(self, line: &str) -> bool {
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| line.starts_with(p));
        let contains = |words: &[&str]| words.iter().any(|w| line.contains(w));

        match self {
            Section::None => false,
            Section::SubNest => {
                starts(SUBNEST_HEADER_PREFIXES)
                    || contains(SUBNEST_HEADER_WORDS)
                    || line == "nc"
                    || starts(SUBNEST_SUMMARY_PREFIXES)
            }
            Section::Parts => line.starts_with("no.") || contains(PARTS_HEADER_WORDS),
            Section::MaterialData => {
                starts(MATERIAL_HEADER_PREFIXES) || contains(MATERIAL_HEADER_WORDS)
            }
        }
    }
}

/// Index-based cursor over the trimmed, non-blank lines of a text.
///
/// Lets a step consume the current line and optionally the one after it.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        LineCursor {
            lines: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Consume lines up to and including the heading of `section`.
    fn seek(&mut self, section: Section) -> bool {
        while let Some(line) = self.advance() {
            if section.opens(&folded(line)) {
                log::debug!("entered {section:?} section at '{line}'");
                return true;
            }
        }
        false
    }

    /// Read a row number starting at `first`, merging a row number that the
    /// extractor split into two stacked single digits ("1", "0" -> 10).
    fn row_number(&mut self, first: &str) -> Option<u32> {
        let mut digits = first.to_string();
        if first.len() == 1 {
            if let Some(next) = self.peek() {
                if next.len() == 1 && is_digits(next) {
                    digits.push_str(next);
                    self.pos += 1;
                }
            }
        }
        digits.parse().ok()
    }
}

/// Lowercase and collapse whitespace, for heading and caption comparisons.
fn folded(line: &str) -> String {
    normalize_ws(&line.to_lowercase())
}

/// The legacy report parser. Stateless between calls; each entry point runs
/// its own pass with its own row state.
pub struct SectionStateParser<'o> {
    options: &'o ParseOptions,
}

impl<'o> SectionStateParser<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        SectionStateParser { options }
    }

    /// Rows of the "SubNest" (nesting summary) section.
    ///
    /// Returns an empty list when the section is missing; substituting the
    /// placeholder rows is the layout selector's decision, not this pass's.
    pub fn subnest_rows(&self, text: &str) -> Vec<SubNestRow> {
        let mut cursor = LineCursor::new(text);
        let mut rows = Vec::new();
        if !cursor.seek(Section::SubNest) {
            log::debug!("no SubNest section found");
            return rows;
        }

        let mut pending: Option<u32> = None;
        while let Some(line) = cursor.advance() {
            let lower = folded(line);
            if Section::SubNest.closes(&lower) {
                log::debug!("leaving SubNest section at '{line}'");
                break;
            }
            if Section::SubNest.is_header(&lower) {
                log::debug!("skipping SubNest header line: {line}");
                continue;
            }

            if is_digits(line) {
                if let Some(dropped) = pending {
                    log::debug!("SubNest row {dropped} has no data line, dropped");
                }
                pending = cursor.row_number(line);
                continue;
            }

            let Some(row_no) = pending else {
                log::debug!("skipping SubNest line outside a row: {line}");
                continue;
            };

            match subnest_row(row_no, line) {
                Some(row) => {
                    rows.push(row);
                    pending = None;
                }
                None => log::debug!("SubNest row {row_no}: too few tokens in '{line}'"),
            }
        }

        log::info!("legacy SubNest pass produced {} row(s)", rows.len());
        rows
    }

    /// Rows of the "Parts" section. Part names may span several lines; the
    /// row closes on the line starting with a material code.
    pub fn parts_rows(&self, text: &str) -> Vec<PartRow> {
        let mut cursor = LineCursor::new(text);
        let mut rows = Vec::new();
        if !cursor.seek(Section::Parts) {
            log::debug!("no Parts section found");
            return rows;
        }

        let mut current: Option<u32> = None;
        let mut name = String::new();
        while let Some(line) = cursor.advance() {
            let lower = folded(line);
            if Section::Parts.closes(&lower) {
                log::debug!("leaving Parts section at '{line}'");
                break;
            }
            if Section::Parts.is_header(&lower) {
                log::debug!("skipping Parts header line: {line}");
                continue;
            }

            if is_digits(line) {
                current = line.parse().ok();
                name.clear();
                continue;
            }

            let Some(row_no) = current else {
                continue;
            };

            if !self.options.starts_with_material(line) {
                if !name.is_empty() {
                    name.push(' ');
                }
                name.push_str(line);
                continue;
            }

            match part_row(row_no, &name, line) {
                Some(row) => rows.push(row),
                None => log::debug!("Parts row {row_no}: too few tokens in '{line}', dropped"),
            }
            current = None;
            name.clear();
        }

        log::info!("legacy Parts pass produced {} row(s)", rows.len());
        rows
    }

    /// Rows of the "Material Data" section (raw sheet stock).
    pub fn material_rows(&self, text: &str) -> Vec<MaterialRow> {
        let mut cursor = LineCursor::new(text);
        let mut rows = Vec::new();
        if !cursor.seek(Section::MaterialData) {
            log::debug!("no Material Data section found");
            return rows;
        }

        while let Some(line) = cursor.advance() {
            let lower = folded(line);
            if Section::MaterialData.closes(&lower) {
                log::debug!("leaving Material Data section at '{line}'");
                break;
            }
            if Section::MaterialData.is_header(&lower) {
                log::debug!("skipping material header line: {line}");
                continue;
            }

            let tokens = tokenize(line);
            if tokens.len() < MATERIAL_MIN_TOKENS {
                log::debug!("skipping material line with too few tokens: {line}");
                continue;
            }
            if !self.options.is_material_token(tokens[0]) {
                log::debug!("skipping material line without material code: {line}");
                continue;
            }

            rows.push(MaterialRow {
                sheet_id: None,
                material: tokens[0].to_string(),
                thickness: tokens[1].to_string(),
                size_x: Some(tokens[2].to_string()),
                size_y: Some(tokens[3].to_string()),
                sheet_qty: parse_int_safe(tokens[4]),
                notes: None,
                status: false,
            });
        }

        log::info!("legacy Material Data pass produced {} row(s)", rows.len());
        rows
    }
}

/// `sizeX sizeY material thk timePerInst totalTime ncFile qty area [eff]`
fn subnest_row(row_no: u32, line: &str) -> Option<SubNestRow> {
    let tokens = tokenize(line);
    if tokens.len() < SUBNEST_MIN_TOKENS {
        return None;
    }

    Some(SubNestRow {
        row_no,
        preview: None,
        size_x: Some(tokens[0].to_string()),
        size_y: Some(tokens[1].to_string()),
        material: Some(tokens[2].to_string()),
        thickness: Some(tokens[3].to_string()),
        time_per_instance: Some(tokens[4].to_string()),
        total_time: Some(tokens[5].to_string()),
        nc_file: tokens[6].to_string(),
        qty: Some(parse_int_safe(tokens[7])),
        area_m2: Some(parse_float_safe(tokens[8])),
        efficiency_percent: Some(tokens.get(9).map_or(0.0, |t| parse_float_safe(t))),
        status: false,
        location: None,
    })
}

/// `material thk reqQty placedQty weight timePerInst pierceQty ... cuttingLength`
fn part_row(row_no: u32, name: &str, line: &str) -> Option<PartRow> {
    let tokens = tokenize(line);
    if tokens.len() < PARTS_MIN_TOKENS {
        return None;
    }

    let part_name = if name.is_empty() {
        format!("Part-{row_no}")
    } else {
        name.to_string()
    };

    Some(PartRow {
        row_no,
        part_name,
        preview_image_url: None,
        material: Some(tokens[0].to_string()),
        thickness: Some(tokens[1].to_string()),
        required_qty: parse_int_safe(tokens[2]),
        placed_qty: parse_int_safe(tokens[3]),
        weight_kg: parse_float_safe(tokens[4]),
        time_per_instance: Some(tokens[5].to_string()),
        pierce_qty: parse_int_safe(tokens[6]),
        cutting_length: parse_float_safe(tokens[tokens.len() - 1]),
        size_x: None,
        size_y: None,
        status: false,
        location: None,
    })
}

impl LayoutParser for SectionStateParser<'_> {
    fn family(&self) -> LayoutFamily {
        LayoutFamily::Legacy
    }

    fn subnest_rows(&self, text: &str) -> Vec<SubNestRow> {
        SectionStateParser::subnest_rows(self, text)
    }

    fn parts_rows(&self, text: &str) -> Vec<PartRow> {
        SectionStateParser::parts_rows(self, text)
    }

    fn material_rows(&self, text: &str) -> Vec<MaterialRow> {
        SectionStateParser::material_rows(self, text)
    }
}
