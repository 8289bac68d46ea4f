//! JSON cell-manifest workbook
//!
//! Stands in for a spreadsheet filler: the template is opened with
//! [`calamine`] to learn its sheets, cell writes are collected in memory,
//! and saving writes `<output>.json` for an external filler to apply.

use crate::error::{ReportError, ReportResult};
use crate::sink::WorkbookSink;
use bom_metrics::MetricValue;
use calamine::{open_workbook_auto, Reader};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One sheet of the manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManifestSheet {
    /// Sheet hidden after writing
    pub hidden: bool,
    /// A1 reference → value
    pub cells: BTreeMap<String, MetricValue>,
}

/// Saved manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellManifest {
    /// Template the cells belong to
    pub template: PathBuf,
    /// Intended workbook path
    pub output: PathBuf,
    /// Sheets in template order
    pub sheets: Vec<(String, ManifestSheet)>,
}

/// Manifest-writing workbook sink
#[derive(Debug, Clone)]
pub struct JsonWorkbook {
    template: PathBuf,
    order: Vec<String>,
    sheets: BTreeMap<String, ManifestSheet>,
}

impl JsonWorkbook {
    /// Open a template, reading its sheet names
    pub fn open(template: impl AsRef<Path>) -> ReportResult<Self> {
        let template = template.as_ref();
        if !template.exists() {
            return Err(ReportError::TemplateMissing(template.to_path_buf()));
        }
        let workbook = open_workbook_auto(template).map_err(|err| ReportError::Template {
            path: template.to_path_buf(),
            message: err.to_string(),
        })?;
        let sheets = workbook.sheet_names();
        tracing::debug!(template = %template.display(), sheets = ?sheets, "template opened");
        Ok(Self::with_sheets(template, sheets))
    }

    /// Workbook with known sheets, no template read
    #[must_use]
    pub fn with_sheets<I, S>(template: impl Into<PathBuf>, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let order: Vec<String> = sheets.into_iter().map(Into::into).collect();
        Self {
            template: template.into(),
            sheets: order
                .iter()
                .map(|name| (name.clone(), ManifestSheet::default()))
                .collect(),
            order,
        }
    }

    /// Sheet contents so far
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&ManifestSheet> {
        self.sheets.get(name)
    }

    /// Value written to a cell
    #[must_use]
    pub fn cell(&self, sheet: &str, cell: &str) -> Option<&MetricValue> {
        self.sheets.get(sheet).and_then(|contents| contents.cells.get(cell))
    }

    /// Manifest for an output path
    #[must_use]
    pub fn manifest(&self, output: &Path) -> CellManifest {
        CellManifest {
            template: self.template.clone(),
            output: output.to_path_buf(),
            sheets: self
                .order
                .iter()
                .filter_map(|name| {
                    self.sheets
                        .get(name)
                        .map(|sheet| (name.clone(), sheet.clone()))
                })
                .collect(),
        }
    }

    fn sheet_mut(&mut self, sheet: &str) -> ReportResult<&mut ManifestSheet> {
        self.sheets
            .get_mut(sheet)
            .ok_or_else(|| ReportError::MissingSheet(sheet.to_string()))
    }
}

/// Manifest path for a workbook path (`<output>.json`)
#[must_use]
pub fn manifest_path(output: &Path) -> PathBuf {
    let mut path = OsString::from(output.as_os_str());
    path.push(".json");
    PathBuf::from(path)
}

impl WorkbookSink for JsonWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn write_cell(&mut self, sheet: &str, cell: &str, value: MetricValue) -> ReportResult<()> {
        self.sheet_mut(sheet)?.cells.insert(cell.to_string(), value);
        Ok(())
    }

    fn hide_sheet(&mut self, sheet: &str) -> ReportResult<()> {
        self.sheet_mut(sheet)?.hidden = true;
        Ok(())
    }

    fn save(&mut self, output: &Path) -> ReportResult<PathBuf> {
        let path = manifest_path(output);
        let json = serde_json::to_string_pretty(&self.manifest(output))?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, json).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template() {
        let err = JsonWorkbook::open("/no/such/template.xlsx").unwrap_err();
        assert!(matches!(err, ReportError::TemplateMissing(_)));
    }

    #[test]
    fn unreadable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        let err = JsonWorkbook::open(&path).unwrap_err();
        assert!(matches!(err, ReportError::Template { .. }));
    }

    #[test]
    fn manifest_path_appends_json() {
        assert_eq!(
            manifest_path(Path::new("/tmp/BOM_FDH01.xlsx")),
            PathBuf::from("/tmp/BOM_FDH01.xlsx.json")
        );
    }

    #[test]
    fn writes_to_unknown_sheet_fail() {
        let mut workbook = JsonWorkbook::with_sheets("t.xlsx", ["Summary"]);
        assert!(workbook.write_cell("Summary", "F2", "FDH01".into()).is_ok());
        assert!(matches!(
            workbook.write_cell("Nope", "A1", 1.0.into()),
            Err(ReportError::MissingSheet(_))
        ));
        assert_eq!(
            workbook.cell("Summary", "F2"),
            Some(&MetricValue::Text("FDH01".to_string()))
        );
    }

    #[test]
    fn save_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = JsonWorkbook::with_sheets("t.xlsx", ["Summary", "RateCard"]);
        workbook.write_cell("Summary", "C28", 0.19.into()).unwrap();
        workbook.hide_sheet("RateCard").unwrap();

        let saved = workbook.save(&dir.path().join("out/BOM.xlsx")).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
        assert_eq!(json["sheets"][0][0], "Summary");
        assert_eq!(json["sheets"][0][1]["cells"]["C28"], 0.19);
        assert_eq!(json["sheets"][1][1]["hidden"], true);
    }
}
