use crate::config::ParseOptions;
use crate::model::{LayoutFamily, MaterialRow, PartRow, SubNestRow};
use crate::parsing::fallback::placeholder_subnest_rows;
use crate::parsing::{LayoutParser, NestBlockParser, SectionStateParser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which parser family a run should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreference {
    /// Legacy first; nest-result blocks when the legacy pass finds nothing.
    #[default]
    Auto,
    Legacy,
    NestResult,
}

impl FromStr for LayoutPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(LayoutPreference::Auto),
            "legacy" => Ok(LayoutPreference::Legacy),
            "nest" | "nest_result" | "nest-result" => Ok(LayoutPreference::NestResult),
            other => Err(format!(
                "unknown layout '{other}' (expected auto, legacy or nest)"
            )),
        }
    }
}

impl fmt::Display for LayoutPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPreference::Auto => write!(f, "auto"),
            LayoutPreference::Legacy => write!(f, "legacy"),
            LayoutPreference::NestResult => write!(f, "nest"),
        }
    }
}

/// Nesting-summary rows plus how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct SubNestSelection {
    pub rows: Vec<SubNestRow>,
    pub family: LayoutFamily,
    pub used_placeholder: bool,
}

/// Run one pass with the parser family chosen by `options.layout`.
fn run_pass<R>(
    text: &str,
    options: &ParseOptions,
    pass: impl Fn(&dyn LayoutParser, &str) -> Vec<R>,
) -> (Vec<R>, LayoutFamily) {
    let legacy = SectionStateParser::new(options);
    let nest = NestBlockParser::new();

    match options.layout {
        LayoutPreference::Legacy => (pass(&legacy, text), LayoutFamily::Legacy),
        LayoutPreference::NestResult => (pass(&nest, text), LayoutFamily::NestResult),
        LayoutPreference::Auto => {
            let rows = pass(&legacy, text);
            if !rows.is_empty() || LayoutFamily::detect(text) != LayoutFamily::NestResult {
                return (rows, LayoutFamily::Legacy);
            }
            log::info!("legacy layout found nothing, trying nest-result blocks");
            (pass(&nest, text), LayoutFamily::NestResult)
        }
    }
}

/// Nesting-summary rows, with the placeholder substituted for an empty
/// legacy result when `options.placeholder_fallback` is on.
pub fn select_subnest(text: &str, options: &ParseOptions) -> SubNestSelection {
    let (rows, family) = run_pass(text, options, |p, t| p.subnest_rows(t));

    if rows.is_empty() && family == LayoutFamily::Legacy && options.placeholder_fallback {
        log::warn!("no SubNest rows parsed, returning placeholder rows");
        return SubNestSelection {
            rows: placeholder_subnest_rows(),
            family,
            used_placeholder: true,
        };
    }

    SubNestSelection {
        rows,
        family,
        used_placeholder: false,
    }
}

pub fn select_parts(text: &str, options: &ParseOptions) -> (Vec<PartRow>, LayoutFamily) {
    run_pass(text, options, |p, t| p.parts_rows(t))
}

pub fn select_materials(text: &str, options: &ParseOptions) -> (Vec<MaterialRow>, LayoutFamily) {
    run_pass(text, options, |p, t| p.material_rows(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = "SubNest\n1\n1250 3500 GI 0.8 00:01:00 00:01:00 TTLLP001 1 4.38 80\n";
    const NEST: &str = "Nest Result1\nMaterial: GI Thickness: 0.8mm\nPlate Size: 1250 x 2500mm\n";

    fn options(layout: LayoutPreference, placeholder_fallback: bool) -> ParseOptions {
        ParseOptions {
            layout,
            placeholder_fallback,
            ..ParseOptions::default()
        }
    }

    #[test]
    fn test_auto_prefers_legacy() {
        let selection = select_subnest(LEGACY, &ParseOptions::default());
        assert_eq!(selection.family, LayoutFamily::Legacy);
        assert_eq!(selection.rows.len(), 1);
        assert!(!selection.used_placeholder);
    }

    #[test]
    fn test_auto_falls_through_to_nest_blocks() {
        let selection = select_subnest(NEST, &ParseOptions::default());
        assert_eq!(selection.family, LayoutFamily::NestResult);
        assert_eq!(selection.rows[0].nc_file, "NEST1");
        assert!(!selection.used_placeholder);
    }

    #[test]
    fn test_empty_legacy_gets_placeholder() {
        let selection = select_subnest("nothing here", &ParseOptions::default());
        assert!(selection.used_placeholder);
        assert_eq!(selection.rows.len(), 3);
        assert_eq!(selection.rows[0].nc_file, "TTLLP001");
    }

    #[test]
    fn test_placeholder_can_be_disabled() {
        let selection = select_subnest("nothing here", &options(LayoutPreference::Auto, false));
        assert!(!selection.used_placeholder);
        assert!(selection.rows.is_empty());
    }

    #[test]
    fn test_forced_nest_never_uses_placeholder() {
        let selection = select_subnest(LEGACY, &options(LayoutPreference::NestResult, true));
        assert_eq!(selection.family, LayoutFamily::NestResult);
        assert!(selection.rows.is_empty());
        assert!(!selection.used_placeholder);
    }

    #[test]
    fn test_forced_legacy_ignores_nest_blocks() {
        let selection = select_subnest(NEST, &options(LayoutPreference::Legacy, true));
        assert_eq!(selection.family, LayoutFamily::Legacy);
        assert!(selection.used_placeholder);
    }

    #[test]
    fn test_materials_auto() {
        let (rows, family) = select_materials(NEST, &ParseOptions::default());
        assert_eq!(family, LayoutFamily::NestResult);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sheet_qty, 1);
    }

    #[test]
    fn test_parts_empty_without_sections() {
        let (rows, family) = select_parts("nothing here", &ParseOptions::default());
        assert!(rows.is_empty());
        assert_eq!(family, LayoutFamily::Legacy);
    }

    #[test]
    fn test_layout_preference_from_str() {
        assert_eq!("AUTO".parse::<LayoutPreference>(), Ok(LayoutPreference::Auto));
        assert_eq!("nest".parse::<LayoutPreference>(), Ok(LayoutPreference::NestResult));
        assert_eq!("nest-result".parse::<LayoutPreference>(), Ok(LayoutPreference::NestResult));
        assert!("tabular".parse::<LayoutPreference>().is_err());
        assert_eq!(LayoutPreference::NestResult.to_string(), "nest");
    }
}
