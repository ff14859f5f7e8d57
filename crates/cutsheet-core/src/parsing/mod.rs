pub mod fallback;
pub mod legacy;
pub mod nest;
pub mod values;

use crate::model::{LayoutFamily, MaterialRow, PartRow, SubNestRow};

pub use legacy::SectionStateParser;
pub use nest::NestBlockParser;

/// A report-layout grammar turning flat text into rows.
///
/// Implementations never fail: rows they cannot make sense of are skipped
/// and a document they do not recognize yields empty lists.
pub trait LayoutParser {
    fn family(&self) -> LayoutFamily;

    fn subnest_rows(&self, text: &str) -> Vec<SubNestRow>;

    fn parts_rows(&self, text: &str) -> Vec<PartRow>;

    fn material_rows(&self, text: &str) -> Vec<MaterialRow>;
}

impl LayoutFamily {
    /// Guess the family from the text: any `Nest Result<N>` heading means nest-result.
    pub fn detect(text: &str) -> LayoutFamily {
        if nest::has_nest_blocks(text) {
            LayoutFamily::NestResult
        } else {
            LayoutFamily::Legacy
        }
    }
}
