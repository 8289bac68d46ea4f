//! Output path resolution
//!
//! An explicit path wins. Otherwise the workbook lands in the user's
//! documents folder, preferring a OneDrive-synced one, under a name built
//! from the boundary id and the run time. Either way the extension is
//! forced to `.xlsx`.

use bom_model::BoundaryId;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// File name used when no boundary id is known
pub const DEFAULT_FILE_NAME: &str = "Exported_BOM.xlsx";

/// Timestamp format inside default file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%m-%d-%Y_%H%M%S";

/// `BOM_<ID>_<timestamp>.xlsx`, or [`DEFAULT_FILE_NAME`]
#[must_use]
pub fn default_file_name(boundary: Option<&BoundaryId>, now: NaiveDateTime) -> String {
    match boundary {
        Some(id) => format!("BOM_{id}_{}.xlsx", now.format(FILE_TIMESTAMP_FORMAT)),
        None => DEFAULT_FILE_NAME.to_string(),
    }
}

/// Append `.xlsx` unless the name already ends with it (any case)
#[must_use]
pub fn ensure_xlsx(path: PathBuf) -> PathBuf {
    let has_extension = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"));
    if has_extension {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(".xlsx");
    PathBuf::from(name)
}

/// First `OneDrive*/Documents` folder under `home`, by name
#[must_use]
pub fn onedrive_documents(home: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(home).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("OneDrive"))
        .map(|entry| entry.path().join("Documents"))
        .filter(|documents| documents.is_dir())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Per-user documents folder
#[must_use]
pub fn documents_dir() -> PathBuf {
    let home = dirs::home_dir();
    if let Some(onedrive) = home.as_deref().and_then(onedrive_documents) {
        return onedrive;
    }
    dirs::document_dir()
        .or_else(|| home.map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Final workbook path
///
/// `documents` overrides the per-user documents lookup.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&Path>,
    documents: Option<&Path>,
    boundary: Option<&BoundaryId>,
    now: NaiveDateTime,
) -> PathBuf {
    let path = match explicit.filter(|path| !path.as_os_str().is_empty()) {
        Some(path) => path.to_path_buf(),
        None => {
            let folder = documents.map_or_else(documents_dir, Path::to_path_buf);
            let path = folder.join(default_file_name(boundary, now));
            tracing::info!(path = %path.display(), "no output path given, using default");
            path
        }
    };
    ensure_xlsx(path)
}
