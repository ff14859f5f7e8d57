//! Map parsed rows back to where they were printed in the PDF.
//!
//! Each row picks one identifying token and binds to the first fragment, in
//! reading order, whose text contains it. A token that recurs (a part name
//! reused by several nests) always binds to its first occurrence; that is a
//! known limitation of substring matching, not something to paper over here.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::extraction::PositionFragment;
use crate::model::{LayoutFamily, PageLocation, PartRow, SubNestRow};
use crate::parsing::nest::split_blocks;

lazy_static! {
    /// Part ids such as `BRK-001`, `TT001` or `P12_A` embedded in a part name.
    static ref RE_PART_ID: Regex = Regex::new(r"\b[A-Za-z]+[-_]?\d+[A-Za-z0-9_-]*\b").unwrap();
}

/// Position fragments in document order, searchable by substring.
#[derive(Debug, Clone, Copy)]
pub struct RowPositionIndex<'a> {
    fragments: &'a [PositionFragment],
}

impl<'a> RowPositionIndex<'a> {
    pub fn new(fragments: &'a [PositionFragment]) -> Self {
        RowPositionIndex { fragments }
    }

    /// First fragment whose text contains `needle`. An empty needle matches nothing.
    pub fn first_containing(&self, needle: &str) -> Option<&'a PositionFragment> {
        if needle.is_empty() {
            return None;
        }
        self.fragments.iter().find(|f| f.text.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Headings of the nest-result blocks, keyed by the `NEST<id>` filename the
/// block parser gives their rows. First block wins for a repeated id.
pub fn nest_headings(text: &str) -> HashMap<String, &str> {
    let mut headings = HashMap::new();
    for block in split_blocks(text) {
        headings
            .entry(format!("NEST{}", block.nest_id))
            .or_insert(block.heading);
    }
    headings
}

/// Token identifying a nesting-summary row in the document.
///
/// Nest rows search for their heading as printed; `headings` comes from
/// [`nest_headings`] and is ignored for the legacy family.
pub fn subnest_search_token(
    row: &SubNestRow,
    family: LayoutFamily,
    headings: &HashMap<String, &str>,
) -> String {
    match family {
        LayoutFamily::NestResult => match headings.get(&row.nc_file) {
            Some(heading) => heading.to_string(),
            None => match row.nc_file.strip_prefix("NEST") {
                Some(id) => format!("Nest Result{id}"),
                None => row.nc_file.clone(),
            },
        },
        LayoutFamily::Legacy => row.nc_file.clone(),
    }
}

/// Token identifying a part row in the document.
pub fn part_search_token(row: &PartRow, family: LayoutFamily) -> String {
    match family {
        LayoutFamily::NestResult => RE_PART_ID
            .find(&row.part_name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| row.part_name.clone()),
        LayoutFamily::Legacy => row.part_name.clone(),
    }
}

/// Attach page, y-position and page height to each row that can be found.
/// `text` is the flat text the rows were parsed from.
pub fn locate_subnest_rows(
    rows: Vec<SubNestRow>,
    index: &RowPositionIndex<'_>,
    family: LayoutFamily,
    text: &str,
) -> Vec<SubNestRow> {
    let headings = match family {
        LayoutFamily::NestResult => nest_headings(text),
        LayoutFamily::Legacy => HashMap::new(),
    };

    rows.into_iter()
        .map(|row| {
            let token = subnest_search_token(&row, family, &headings);
            let location = index.first_containing(&token).map(|f| PageLocation {
                page: f.page,
                y_position: f.y_position,
                page_height: Some(f.page_height),
            });
            if location.is_none() {
                log::debug!("no fragment contains '{token}' (SubNest row {})", row.row_no);
            }
            SubNestRow { location, ..row }
        })
        .collect()
}

/// Attach page and y-position to each part row that can be found.
pub fn locate_part_rows(
    rows: Vec<PartRow>,
    index: &RowPositionIndex<'_>,
    family: LayoutFamily,
) -> Vec<PartRow> {
    rows.into_iter()
        .map(|row| {
            let token = part_search_token(&row, family);
            let location = index.first_containing(&token).map(|f| PageLocation {
                page: f.page,
                y_position: f.y_position,
                page_height: None,
            });
            if location.is_none() {
                log::debug!("no fragment contains '{token}' (part row {})", row.row_no);
            }
            PartRow { location, ..row }
        })
        .collect()
}
