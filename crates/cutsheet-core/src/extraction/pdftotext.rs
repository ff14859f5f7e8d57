use crate::error::CutsheetError;
use crate::extraction::{DecodedDocument, PdfExtractor, PositionFragment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

/// How pdftotext should lay out the flat text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextMode {
    /// Content-stream order (`-raw`). Keeps stacked table cells on their own lines.
    #[default]
    Raw,
    /// Column-preserving layout (`-layout`).
    Layout,
}

impl TextMode {
    fn flag(self) -> &'static str {
        match self {
            TextMode::Raw => "-raw",
            TextMode::Layout => "-layout",
        }
    }
}

impl FromStr for TextMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(TextMode::Raw),
            "layout" => Ok(TextMode::Layout),
            other => Err(format!("unknown text mode '{other}' (expected raw or layout)")),
        }
    }
}

/// PDF decoding backend using pdftotext (from poppler-utils).
///
/// Runs pdftotext twice on the same temp file: once for the flat text and
/// once with `-bbox-layout` for the line positions used in highlighting.
pub struct PdftotextExtractor {
    mode: TextMode,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_mode(TextMode::default())
    }

    pub fn with_mode(mode: TextMode) -> Self {
        PdftotextExtractor { mode }
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract(&self, pdf_bytes: &[u8]) -> Result<DecodedDocument, CutsheetError> {
        // The temp file is removed when `tmpfile` drops, on every return path.
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| CutsheetError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| CutsheetError::Extraction(e.to_string()))?;
        tmpfile
            .flush()
            .map_err(|e| CutsheetError::Extraction(e.to_string()))?;

        let raw = run_pdftotext(self.mode.flag(), tmpfile.path())?;
        // pdftotext separates pages with form feeds
        let text = raw.replace('\x0c', "\n");

        let xml = run_pdftotext("-bbox-layout", tmpfile.path())?;
        let fragments = parse_bbox_xml(&xml)?;

        log::debug!(
            "pdftotext decoded {} bytes into {} chars and {} fragments",
            pdf_bytes.len(),
            text.len(),
            fragments.len()
        );

        Ok(DecodedDocument { text, fragments })
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(mode_flag: &str, pdf_path: &Path) -> Result<String, CutsheetError> {
    let output = Command::new("pdftotext")
        .arg(mode_flag)
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CutsheetError::PdftotextNotFound
            } else {
                CutsheetError::Extraction(format!("pdftotext {mode_flag} failed: {e}"))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(CutsheetError::PdftotextFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Turn `pdftotext -bbox-layout` XHTML into one fragment per `<line>`.
///
/// Pages are numbered by order of appearance; the line's `yMin` becomes the
/// fragment's vertical offset.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<PositionFragment>, CutsheetError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut out = Vec::new();
    let mut page: u32 = 0;
    let mut page_height: f32 = 0.0;
    let mut line_y: Option<f32> = None;
    let mut words: Vec<String> = Vec::new();
    let mut in_word = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => match tag.name().as_ref() {
                b"page" => {
                    page += 1;
                    page_height = attr_f32(&tag, b"height")?.unwrap_or(0.0);
                }
                b"line" => {
                    line_y = attr_f32(&tag, b"yMin")?;
                    words.clear();
                }
                b"word" => in_word = true,
                _ => {}
            },
            Ok(Event::Empty(tag)) if tag.name().as_ref() == b"page" => {
                page += 1;
            }
            Ok(Event::Text(text)) if in_word => {
                let word = text
                    .unescape()
                    .map_err(|e| CutsheetError::BboxXml(e.to_string()))?;
                let word = word.trim();
                if !word.is_empty() {
                    words.push(word.to_string());
                }
            }
            Ok(Event::End(tag)) => match tag.name().as_ref() {
                b"word" => in_word = false,
                b"line" => {
                    if let Some(y_position) = line_y.take() {
                        let text = words.join(" ");
                        if !text.is_empty() && page > 0 {
                            out.push(PositionFragment {
                                text,
                                page,
                                y_position,
                                page_height,
                            });
                        }
                    }
                    words.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CutsheetError::BboxXml(format!(
                    "at byte {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}

fn attr_f32(tag: &BytesStart<'_>, name: &[u8]) -> Result<Option<f32>, CutsheetError> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| CutsheetError::BboxXml(e.to_string()))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| CutsheetError::BboxXml(e.to_string()))?;
            return Ok(value.trim().parse().ok());
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="CutPlan"/>
</head>
<body>
<doc>
  <page width="595.276000" height="841.890000">
    <flow>
      <block xMin="40.0" yMin="50.0" xMax="200.0" yMax="62.0">
        <line xMin="40.0" yMin="50.5" xMax="200.0" yMax="62.0">
          <word xMin="40.0" yMin="50.5" xMax="70.0" yMax="62.0">Nest</word>
          <word xMin="72.0" yMin="50.5" xMax="120.0" yMax="62.0">Result1</word>
        </line>
        <line xMin="40.0" yMin="70.0" xMax="200.0" yMax="82.0">
          <word xMin="40.0" yMin="70.0" xMax="90.0" yMax="82.0">Nuts</word>
          <word xMin="92.0" yMin="70.0" xMax="99.0" yMax="82.0">&amp;</word>
          <word xMin="101.0" yMin="70.0" xMax="140.0" yMax="82.0">Bolts</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="595.276000" height="842.000000">
    <flow>
      <block xMin="40.0" yMin="30.0" xMax="200.0" yMax="42.0">
        <line xMin="40.0" yMin="30.0" xMax="200.0" yMax="42.0">
          <word xMin="40.0" yMin="30.0" xMax="70.0" yMax="42.0">Nest</word>
          <word xMin="72.0" yMin="30.0" xMax="120.0" yMax="42.0">Result2</word>
        </line>
      </block>
    </flow>
  </page>
</doc>
</body>
</html>
"#;

    #[test]
    fn test_parse_bbox_xml_lines() {
        let fragments = parse_bbox_xml(BBOX).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].text, "Nest Result1");
        assert_eq!(fragments[0].page, 1);
        assert_eq!(fragments[0].y_position, 50.5);
        assert_eq!(fragments[0].page_height, 841.89);
    }

    #[test]
    fn test_entities_are_decoded() {
        let fragments = parse_bbox_xml(BBOX).unwrap();
        assert_eq!(fragments[1].text, "Nuts & Bolts");
    }

    #[test]
    fn test_pages_numbered_in_order() {
        let fragments = parse_bbox_xml(BBOX).unwrap();
        assert_eq!(fragments[2].text, "Nest Result2");
        assert_eq!(fragments[2].page, 2);
        assert_eq!(fragments[2].page_height, 842.0);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<doc><page height=\"10\"><line yMin=\"1\"><word>x</line></page></doc>";
        assert!(matches!(
            parse_bbox_xml(xml),
            Err(CutsheetError::BboxXml(_))
        ));
    }

    #[test]
    fn test_text_mode_flags() {
        assert_eq!(TextMode::Raw.flag(), "-raw");
        assert_eq!(TextMode::Layout.flag(), "-layout");
        assert_eq!(TextMode::default(), TextMode::Raw);
        assert_eq!(PdftotextExtractor::new().mode, TextMode::Raw);
        assert_eq!(
            PdftotextExtractor::with_mode(TextMode::Layout).mode,
            TextMode::Layout
        );
    }

    #[test]
    fn test_text_mode_from_str() {
        assert_eq!("Layout".parse::<TextMode>(), Ok(TextMode::Layout));
        assert_eq!("raw".parse::<TextMode>(), Ok(TextMode::Raw));
        assert!("columns".parse::<TextMode>().is_err());
    }
}
