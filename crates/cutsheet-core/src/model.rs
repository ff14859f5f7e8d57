use serde::{Deserialize, Serialize};
use std::fmt;

/// The two structurally distinct report formats the parsers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutFamily {
    /// Tabular report with "SubNest", "Parts" and "Material Data" sections.
    Legacy,
    /// Report made of repeated "Nest Result<N>" blocks.
    NestResult,
}

impl fmt::Display for LayoutFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutFamily::Legacy => write!(f, "legacy"),
            LayoutFamily::NestResult => write!(f, "nest-result"),
        }
    }
}

/// Where a row was rendered in the source PDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLocation {
    pub page: u32,
    pub y_position: f32,
    /// Only attached for nesting-summary rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_height: Option<f32>,
}

/// One nesting sheet (plate) result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubNestRow {
    /// Parser-local row number. Not unique across sections or documents.
    pub row_no: u32,
    pub preview: Option<String>,
    pub size_x: Option<String>,
    pub size_y: Option<String>,
    pub material: Option<String>,
    pub thickness: Option<String>,
    pub time_per_instance: Option<String>,
    pub total_time: Option<String>,
    pub nc_file: String,
    pub qty: Option<u32>,
    pub area_m2: Option<f64>,
    pub efficiency_percent: Option<f64>,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PageLocation>,
}

/// One distinct part definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRow {
    pub row_no: u32,
    pub part_name: String,
    pub preview_image_url: Option<String>,
    pub material: Option<String>,
    pub thickness: Option<String>,
    pub required_qty: u32,
    pub placed_qty: u32,
    pub weight_kg: f64,
    pub time_per_instance: Option<String>,
    pub pierce_qty: u32,
    pub cutting_length: f64,
    /// Only reported by the nest-result layout.
    pub size_x: Option<String>,
    pub size_y: Option<String>,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PageLocation>,
}

/// One raw-sheet stock line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub sheet_id: Option<String>,
    pub material: String,
    pub thickness: String,
    pub size_x: Option<String>,
    pub size_y: Option<String>,
    pub sheet_qty: u32,
    pub notes: Option<String>,
    pub status: bool,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSheets {
    /// Layout family that produced the nesting-summary rows.
    pub family: LayoutFamily,
    pub subnest: Vec<SubNestRow>,
    pub parts: Vec<PartRow>,
    pub materials: Vec<MaterialRow>,
    /// True when `subnest` holds the fixed placeholder rows instead of parsed data.
    pub used_placeholder: bool,
}
