//! Export gating

use crate::error::ExportSkip;
use std::path::PathBuf;

/// Vendor rate selections written to the rate cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRates {
    /// Construction vendor rate
    pub construction: String,
    /// Design vendor rate
    pub design: String,
}

impl VendorRates {
    /// Create rates
    #[inline]
    #[must_use]
    pub fn new(construction: impl Into<String>, design: impl Into<String>) -> Self {
        Self {
            construction: construction.into(),
            design: design.into(),
        }
    }
}

/// Caller's export parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequest {
    /// Export flag
    pub enabled: bool,
    /// Construction vendor rate
    pub construction_rate: Option<String>,
    /// Design vendor rate
    pub design_rate: Option<String>,
    /// Explicit output path
    pub output: Option<PathBuf>,
}

impl ExportRequest {
    /// No export
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Export with the given rates
    #[must_use]
    pub fn new(construction_rate: impl Into<String>, design_rate: impl Into<String>) -> Self {
        Self {
            enabled: true,
            construction_rate: Some(construction_rate.into()),
            design_rate: Some(design_rate.into()),
            output: None,
        }
    }

    /// With explicit output path
    #[inline]
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Rates to export with, or why the export is skipped
    pub fn validate(&self) -> Result<VendorRates, ExportSkip> {
        if !self.enabled {
            return Err(ExportSkip::NotRequested);
        }
        let construction = non_blank(self.construction_rate.as_deref())
            .ok_or(ExportSkip::MissingRate("construction"))?;
        let design =
            non_blank(self.design_rate.as_deref()).ok_or(ExportSkip::MissingRate("design"))?;
        Ok(VendorRates::new(construction, design))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
