//! Run configuration
//!
//! Every field is optional in the TOML file; anything missing falls back to
//! the production defaults.
//!
//! ```toml
//! filter_spatial_reference = 102100
//! default_boundary_wkid = 4326
//! template_path = "TEST_BOM_Template.xlsx"
//! output_dir = "/srv/bom"
//!
//! [layers]
//! conduit = "cd6de7b04ed144fe833317fd7fd7731e"
//! ```

use crate::error::ConfigError;
use bom_model::SpatialReference;
use bom_query::LayerCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "BOM_CONFIG";

/// Template file name shipped alongside the tool
pub const DEFAULT_TEMPLATE: &str = "TEST_BOM_Template.xlsx";

/// Roll-up configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BomConfig {
    /// Layer key → item id
    pub layers: LayerCatalog,
    /// Spatial reference of every layer filter
    pub filter_spatial_reference: u32,
    /// Spatial reference assumed for untagged boundary geometry
    pub default_boundary_wkid: u32,
    /// Report template
    pub template_path: PathBuf,
    /// Output folder overriding the per-user documents folder
    pub output_dir: Option<PathBuf>,
}

impl BomConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Read a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Explicit file, else `BOM_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_toml_file(path),
            None => match std::env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
                Some(path) => Self::from_toml_file(PathBuf::from(path)),
                None => Ok(Self::default()),
            },
        }
    }

    /// With layer catalog
    #[inline]
    #[must_use]
    pub fn with_layers(mut self, layers: LayerCatalog) -> Self {
        self.layers = layers;
        self
    }

    /// With template path
    #[inline]
    #[must_use]
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// With output folder
    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// With filter spatial reference
    #[inline]
    #[must_use]
    pub fn with_filter_spatial_reference(mut self, wkid: u32) -> Self {
        self.filter_spatial_reference = wkid;
        self
    }

    /// Filter spatial reference
    #[inline]
    #[must_use]
    pub fn filter_reference(&self) -> SpatialReference {
        SpatialReference::new(self.filter_spatial_reference)
    }

    /// Boundary spatial reference fallback
    #[inline]
    #[must_use]
    pub fn boundary_reference(&self) -> SpatialReference {
        SpatialReference::new(self.default_boundary_wkid)
    }
}

impl Default for BomConfig {
    fn default() -> Self {
        Self {
            layers: LayerCatalog::default(),
            filter_spatial_reference: SpatialReference::WEB_MERCATOR.wkid,
            default_boundary_wkid: SpatialReference::WGS84.wkid,
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            output_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_query::LayerKey;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(BomConfig::from_toml_str("").unwrap(), BomConfig::default());
    }

    #[test]
    fn partial_overrides() {
        let config = BomConfig::from_toml_str(
            r#"
            default_boundary_wkid = 3857
            output_dir = "/srv/bom"

            [layers]
            strand = "strand-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_boundary_wkid, 3857);
        assert_eq!(config.filter_spatial_reference, 102_100);
        assert_eq!(config.output_dir, Some(PathBuf::from("/srv/bom")));
        assert_eq!(config.layers.get(LayerKey::Strand).as_str(), "strand-test");
        assert_eq!(
            config.layers.get(LayerKey::Poles),
            LayerCatalog::default().get(LayerKey::Poles)
        );
    }

    #[test]
    fn invalid_toml() {
        let err = BomConfig::from_toml_str("filter_spatial_reference = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn file_loading() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "template_path = \"t.xlsx\"").unwrap();
        let config = BomConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.template_path, PathBuf::from("t.xlsx"));

        let err = BomConfig::from_toml_file("/no/such/bom.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
