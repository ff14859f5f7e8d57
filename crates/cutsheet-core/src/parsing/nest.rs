//! Block parser for the "Nest Result" report family.
//!
//! These reports print one block per nesting run, headed `Nest Result<N>`,
//! with labeled scalar fields (`Material:`, `Thickness:`, `Plate Size:` ...)
//! and a small parts table under a `Parts List` heading. Fields are pulled
//! out of the whole block with independent patterns; a field that does not
//! match stays unset.

use lazy_static::lazy_static;
use regex::Regex;

use super::values::{parse_float_opt, parse_int_safe};
use super::LayoutParser;
use crate::model::{LayoutFamily, MaterialRow, PartRow, SubNestRow};

lazy_static! {
    static ref RE_NEST_HEADING: Regex = Regex::new(r"(?i)Nest\s*Result\s*(\d+)").unwrap();

    static ref RE_MATERIAL: Regex = Regex::new(r"(?i)Material:\s*(\S+)").unwrap();

    /// Thickness number immediately followed by `mm`
    static ref RE_THICKNESS: Regex = Regex::new(r"(?i)Thickness:\s*(\d+(?:\.\d+)?)mm").unwrap();

    static ref RE_PLATE_SIZE: Regex =
        Regex::new(r"(?i)Plate Size:\s*(\d+(?:\.\d+)?)\s*x\s*(\d+(?:\.\d+)?)\s*mm").unwrap();

    static ref RE_PARTS_COUNT: Regex = Regex::new(r"(?i)Parts List\s*(\d+)\s*Parts").unwrap();

    static ref RE_PROCESS_TIME: Regex =
        Regex::new(r"(?i)Plan Process Time:\s*(\d+(?:\.\d+)?s?)").unwrap();

    static ref RE_PARTS_HEADING: Regex = Regex::new(r"(?i)Parts List").unwrap();

    /// `<rowIndex> <partName> <sizeX> x <sizeY> mm <qty>`
    static ref RE_PART_ROW: Regex = Regex::new(
        r"(?i)^(\d+)\s+(.+?)\s+(\d+(?:\.\d+)?)\s*x\s*(\d+(?:\.\d+)?)\s*mm\s+(\d+)$"
    )
    .unwrap();
}

/// Caption words inside the parts table.
const PART_TABLE_CAPTIONS: &[&str] = &["thumbnail", "part name", "size"];

/// One `Nest Result<N>` block and the scalars found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct NestBlock<'a> {
    pub nest_id: String,
    /// The heading exactly as printed, e.g. `NEST RESULT 3`.
    pub heading: &'a str,
    pub material: Option<String>,
    pub thickness: Option<String>,
    pub plate_size_x: Option<String>,
    pub plate_size_y: Option<String>,
    pub parts_count: Option<u32>,
    pub process_time: Option<String>,
    pub raw_text: &'a str,
}

impl<'a> NestBlock<'a> {
    /// Extract the labeled fields from a block's text.
    pub fn from_block(nest_id: &str, raw_text: &'a str) -> Self {
        let (plate_size_x, plate_size_y) = match RE_PLATE_SIZE.captures(raw_text) {
            Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
            None => (None, None),
        };

        NestBlock {
            nest_id: nest_id.to_string(),
            heading: RE_NEST_HEADING
                .find(raw_text)
                .map_or("", |m| m.as_str()),
            material: first_capture(&RE_MATERIAL, raw_text),
            thickness: first_capture(&RE_THICKNESS, raw_text),
            plate_size_x,
            plate_size_y,
            parts_count: first_capture(&RE_PARTS_COUNT, raw_text).map(|c| parse_int_safe(&c)),
            process_time: first_capture(&RE_PROCESS_TIME, raw_text),
            raw_text,
        }
    }

    /// Plate area in square metres, when both plate dimensions are known.
    pub fn area_m2(&self) -> Option<f64> {
        let x = parse_float_opt(self.plate_size_x.as_deref()?)?;
        let y = parse_float_opt(self.plate_size_y.as_deref()?)?;
        Some(x * y / 1_000_000.0)
    }

    /// Text after the `Parts List` heading, or `None` when the block has no parts table.
    fn parts_region(&self) -> Option<&'a str> {
        let heading = RE_PARTS_HEADING.find(self.raw_text)?;
        Some(&self.raw_text[heading.end()..])
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].trim().to_string())
}

/// True when the text contains at least one `Nest Result<N>` heading.
pub fn has_nest_blocks(text: &str) -> bool {
    RE_NEST_HEADING.is_match(text)
}

/// Number of `Nest Result<N>` headings in the whole text.
pub fn count_nest_blocks(text: &str) -> usize {
    RE_NEST_HEADING.find_iter(text).count()
}

/// Cut the text into blocks, each running from its heading up to the next
/// heading or the end of the text. Text before the first heading is ignored.
pub fn split_blocks(text: &str) -> Vec<NestBlock<'_>> {
    let headings: Vec<(usize, String)> = RE_NEST_HEADING
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), caps[1].to_string()))
        })
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, (start, id))| {
            let end = headings.get(i + 1).map_or(text.len(), |(next, _)| *next);
            NestBlock::from_block(id, &text[*start..end])
        })
        .collect()
}

/// Parser for the nest-result family. Row counters are local to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestBlockParser;

impl NestBlockParser {
    pub fn new() -> Self {
        NestBlockParser
    }

    /// One row per block, numbered across the whole document.
    pub fn subnest_rows(&self, text: &str) -> Vec<SubNestRow> {
        let rows: Vec<SubNestRow> = split_blocks(text)
            .into_iter()
            .enumerate()
            .map(|(i, block)| SubNestRow {
                row_no: i as u32 + 1,
                preview: None,
                area_m2: block.area_m2(),
                size_x: block.plate_size_x,
                size_y: block.plate_size_y,
                material: block.material,
                thickness: block.thickness,
                time_per_instance: block.process_time.clone(),
                total_time: block.process_time,
                nc_file: format!("NEST{}", block.nest_id),
                qty: block.parts_count,
                efficiency_percent: None,
                status: false,
                location: None,
            })
            .collect();

        log::info!("nest-result SubNest pass produced {} row(s)", rows.len());
        rows
    }

    /// Rows of every block's parts table, numbered across the whole document.
    pub fn parts_rows(&self, text: &str) -> Vec<PartRow> {
        let mut rows = Vec::new();
        let mut row_no: u32 = 0;

        for block in split_blocks(text) {
            let Some(region) = block.parts_region() else {
                log::debug!("Nest Result{} has no parts list", block.nest_id);
                continue;
            };

            for line in region.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let lower = line.to_lowercase();
                if PART_TABLE_CAPTIONS.iter().any(|c| lower.contains(c)) {
                    continue;
                }
                let Some(caps) = RE_PART_ROW.captures(line) else {
                    continue;
                };

                row_no += 1;
                let qty = parse_int_safe(&caps[5]);
                rows.push(PartRow {
                    row_no,
                    part_name: caps[2].trim().to_string(),
                    preview_image_url: None,
                    material: block.material.clone(),
                    thickness: block.thickness.clone(),
                    required_qty: qty,
                    placed_qty: qty,
                    weight_kg: 0.0,
                    time_per_instance: None,
                    pierce_qty: 0,
                    cutting_length: 0.0,
                    size_x: Some(caps[3].to_string()),
                    size_y: Some(caps[4].to_string()),
                    status: false,
                    location: None,
                });
            }
        }

        log::info!("nest-result Parts pass produced {} row(s)", rows.len());
        rows
    }

    /// At most one stock row for the whole document: the first material,
    /// thickness and plate size found anywhere, with one sheet per block.
    pub fn material_rows(&self, text: &str) -> Vec<MaterialRow> {
        let material = first_capture(&RE_MATERIAL, text);
        let thickness = first_capture(&RE_THICKNESS, text);
        let (Some(material), Some(thickness)) = (material, thickness) else {
            log::debug!("nest-result document has no material/thickness");
            return Vec::new();
        };

        let (size_x, size_y) = match RE_PLATE_SIZE.captures(text) {
            Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
            None => (None, None),
        };

        vec![MaterialRow {
            sheet_id: None,
            material,
            thickness,
            size_x,
            size_y,
            sheet_qty: count_nest_blocks(text) as u32,
            notes: None,
            status: false,
        }]
    }
}

impl LayoutParser for NestBlockParser {
    fn family(&self) -> LayoutFamily {
        LayoutFamily::NestResult
    }

    fn subnest_rows(&self, text: &str) -> Vec<SubNestRow> {
        NestBlockParser::subnest_rows(self, text)
    }

    fn parts_rows(&self, text: &str) -> Vec<PartRow> {
        NestBlockParser::parts_rows(self, text)
    }

    fn material_rows(&self, text: &str) -> Vec<MaterialRow> {
        NestBlockParser::material_rows(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BLOCKS: &str = "\
Nesting Report
Nest Result1
Material: GI Thickness: 0.8mm
Plate Size: 1250 x 2500mm
Plan Process Time: 812.5s
Parts List 2 Parts
Thumbnail Part Name Size Qty
1 BRK-001 Bracket 120 x 80 mm 4
2 Gusset 60.5 x 60.5 mm 10
Nest Result2
Material: GI Thickness: 0.8mm
Plate Size: 1000 x 2000mm
Plan Process Time: 300s
Parts List 1 Parts
1 BRK-001 Bracket 120 x 80 mm 2
";

    #[test]
    fn test_split_blocks() {
        let blocks = split_blocks(TWO_BLOCKS);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].nest_id, "1");
        assert_eq!(blocks[1].nest_id, "2");
        assert_eq!(blocks[0].heading, "Nest Result1");
        assert!(blocks[0].raw_text.starts_with("Nest Result1"));
        assert!(!blocks[0].raw_text.contains("Nest Result2"));
        assert!(blocks[1].raw_text.ends_with("2\n"));
    }

    #[test]
    fn test_block_fields() {
        let blocks = split_blocks(TWO_BLOCKS);
        let b = &blocks[0];
        assert_eq!(b.material.as_deref(), Some("GI"));
        assert_eq!(b.thickness.as_deref(), Some("0.8"));
        assert_eq!(b.plate_size_x.as_deref(), Some("1250"));
        assert_eq!(b.plate_size_y.as_deref(), Some("2500"));
        assert_eq!(b.parts_count, Some(2));
        assert_eq!(b.process_time.as_deref(), Some("812.5s"));
    }

    #[test]
    fn test_heading_keeps_printed_form() {
        let blocks = split_blocks("NEST RESULT1\nMaterial: GI\nNest Result 2\nMaterial: GI\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].heading, "NEST RESULT1");
        assert_eq!(blocks[1].heading, "Nest Result 2");
        assert_eq!(blocks[1].nest_id, "2");
    }

    #[test]
    fn test_missing_fields_stay_unset() {
        let block = NestBlock::from_block("7", "Nest Result7\nThickness: 0.8 mm\n");
        assert!(block.material.is_none());
        // space before "mm" does not match
        assert!(block.thickness.is_none());
        assert!(block.plate_size_x.is_none());
        assert!(block.area_m2().is_none());
        assert!(block.parts_count.is_none());
        assert!(block.process_time.is_none());
    }

    #[test]
    fn test_subnest_rows_from_two_blocks() {
        let rows = NestBlockParser::new().subnest_rows(TWO_BLOCKS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_no, 1);
        assert_eq!(rows[0].nc_file, "NEST1");
        assert_eq!(rows[0].area_m2, Some(1250.0 * 2500.0 / 1_000_000.0));
        assert_eq!(rows[0].qty, Some(2));
        assert_eq!(rows[0].total_time.as_deref(), Some("812.5s"));
        assert!(rows[0].efficiency_percent.is_none());
        assert_eq!(rows[1].row_no, 2);
        assert_eq!(rows[1].nc_file, "NEST2");
        assert_eq!(rows[1].area_m2, Some(2.0));
    }

    #[test]
    fn test_parts_rows_numbered_across_blocks() {
        let rows = NestBlockParser::new().parts_rows(TWO_BLOCKS);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].row_no, 1);
        assert_eq!(rows[0].part_name, "BRK-001 Bracket");
        assert_eq!(rows[0].size_x.as_deref(), Some("120"));
        assert_eq!(rows[0].size_y.as_deref(), Some("80"));
        assert_eq!(rows[0].required_qty, 4);
        assert_eq!(rows[0].placed_qty, 4);
        assert_eq!(rows[0].material.as_deref(), Some("GI"));
        assert_eq!(rows[1].part_name, "Gusset");
        assert_eq!(rows[1].size_x.as_deref(), Some("60.5"));
        assert_eq!(rows[2].row_no, 3);
        assert_eq!(rows[2].required_qty, 2);
    }

    #[test]
    fn test_block_without_parts_list_has_no_parts() {
        let text = "Nest Result1\n1 Loose 10 x 10 mm 1\n";
        assert!(NestBlockParser::new().parts_rows(text).is_empty());
    }

    #[test]
    fn test_material_row_counts_blocks() {
        let rows = NestBlockParser::new().material_rows(TWO_BLOCKS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].material, "GI");
        assert_eq!(rows[0].thickness, "0.8");
        assert_eq!(rows[0].size_x.as_deref(), Some("1250"));
        assert_eq!(rows[0].size_y.as_deref(), Some("2500"));
        assert_eq!(rows[0].sheet_qty, 2);
    }

    #[test]
    fn test_material_requires_material_and_thickness() {
        let text = "Nest Result1\nMaterial: GI\nPlate Size: 1250 x 2500mm\n";
        assert!(NestBlockParser::new().material_rows(text).is_empty());
    }

    #[test]
    fn test_headings_case_insensitive() {
        assert!(has_nest_blocks("NEST RESULT12\n"));
        assert_eq!(count_nest_blocks("nest result1 ... Nest Result2"), 2);
        assert!(!has_nest_blocks("Nest Results\n"));
    }

    #[test]
    fn test_no_blocks_everything_empty() {
        let parser = NestBlockParser::new();
        let text = "SubNest\n1\n1250 3500 GI 0.8 00:01:00 00:01:00 TTLLP001 1 4.38 80\n";
        assert!(parser.subnest_rows(text).is_empty());
        assert!(parser.parts_rows(text).is_empty());
        assert!(parser.material_rows(text).is_empty());
    }
}
