use crate::error::CutsheetError;
use crate::layout::LayoutPreference;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for a parse run. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Which layout family to run. `auto` tries legacy first.
    pub layout: LayoutPreference,

    /// Replace an empty legacy nesting summary with the fixed placeholder rows.
    pub placeholder_fallback: bool,

    /// Material codes that open a data line in the legacy Parts and
    /// Material Data sections.
    pub material_prefixes: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            layout: LayoutPreference::Auto,
            placeholder_fallback: true,
            material_prefixes: vec!["GI".to_string()],
        }
    }
}

impl ParseOptions {
    /// Parts rows close on a line that starts with a material code (case-sensitive).
    pub fn starts_with_material(&self, line: &str) -> bool {
        self.material_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// Material Data rows open with a token equal to a material code (any case).
    pub fn is_material_token(&self, token: &str) -> bool {
        self.material_prefixes
            .iter()
            .any(|prefix| token.eq_ignore_ascii_case(prefix))
    }
}

/// Load parse options from a JSON file.
pub fn load_options(path: &Path) -> Result<ParseOptions, CutsheetError> {
    let content = std::fs::read_to_string(path).map_err(|e| CutsheetError::OptionsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_options(&content, path)
}

/// Parse options from a JSON string, reporting errors against `source`.
pub fn parse_options(json: &str, source: &Path) -> Result<ParseOptions, CutsheetError> {
    let options: ParseOptions =
        serde_json::from_str(json).map_err(|e| CutsheetError::OptionsLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_options(&options)?;
    Ok(options)
}

pub fn validate_options(options: &ParseOptions) -> Result<(), CutsheetError> {
    if options.material_prefixes.is_empty() {
        return Err(CutsheetError::OptionsInvalid(
            "material_prefixes must not be empty".into(),
        ));
    }

    if let Some(blank) = options
        .material_prefixes
        .iter()
        .position(|p| p.trim().is_empty())
    {
        return Err(CutsheetError::OptionsInvalid(format!(
            "material_prefixes[{blank}] is blank"
        )));
    }

    if let Some(spaced) = options
        .material_prefixes
        .iter()
        .find(|p| p.chars().any(char::is_whitespace))
    {
        return Err(CutsheetError::OptionsInvalid(format!(
            "material prefix '{spaced}' contains whitespace"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options_from(json: &str) -> Result<ParseOptions, CutsheetError> {
        parse_options(json, Path::new("options.json"))
    }

    #[test]
    fn test_empty_object_gives_defaults() {
        let options = options_from("{}").unwrap();
        assert_eq!(options, ParseOptions::default());
        assert!(options.placeholder_fallback);
        assert_eq!(options.layout, LayoutPreference::Auto);
    }

    #[test]
    fn test_full_options() {
        let options = options_from(
            r#"{"layout": "nest_result", "placeholder_fallback": false, "material_prefixes": ["GI", "MS"]}"#,
        )
        .unwrap();
        assert_eq!(options.layout, LayoutPreference::NestResult);
        assert!(!options.placeholder_fallback);
        assert!(options.is_material_token("ms"));
        assert!(options.starts_with_material("MS 2.0 1 1 0.5 00:00:10 1 10.0"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            options_from(r#"{"layuot": "legacy"}"#),
            Err(CutsheetError::OptionsLoad { .. })
        ));
    }

    #[test]
    fn test_empty_prefixes_rejected() {
        assert!(matches!(
            options_from(r#"{"material_prefixes": []}"#),
            Err(CutsheetError::OptionsInvalid(_))
        ));
    }

    #[test]
    fn test_blank_prefix_rejected() {
        let err = options_from(r#"{"material_prefixes": ["GI", " "]}"#).unwrap_err();
        assert!(err.to_string().contains("material_prefixes[1]"));
    }

    #[test]
    fn test_starts_with_material_is_case_sensitive() {
        let options = ParseOptions::default();
        assert!(options.starts_with_material("GI 0.8 4 4"));
        assert!(!options.starts_with_material("gi 0.8 4 4"));
        assert!(options.is_material_token("gi"));
    }

    #[test]
    fn test_load_options_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"layout": "legacy"}}"#).unwrap();
        let options = load_options(file.path()).unwrap();
        assert_eq!(options.layout, LayoutPreference::Legacy);
    }

    #[test]
    fn test_load_options_missing_file() {
        let err = load_options(Path::new("/nonexistent/cutsheet.json")).unwrap_err();
        assert!(matches!(err, CutsheetError::OptionsLoad { .. }));
    }
}
