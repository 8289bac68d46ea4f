//! Layer identifiers and the catalog of thematic layers
//!
//! Layer item ids are fixed per deployment. [`LayerCatalog::default`] carries
//! the production ids; configuration may override individual entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Portal item id of a feature layer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Create layer id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Thematic layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKey {
    /// Service-area (FDH) boundaries
    FdhBoundary,
    /// Underground conduit
    Conduit,
    /// Vaults, flowerpots, NID boxes
    Structures,
    /// Splice enclosures
    SpliceEnclosures,
    /// Fiber cables
    Cables,
    /// Slack loops
    SlackLoops,
    /// Aerial strand
    Strand,
    /// Utility poles
    Poles,
    /// Passive cabinets
    PassiveCabinets,
    /// Active cabinets
    ActiveCabinets,
    /// Risers
    Risers,
    /// Service drops
    Drops,
    /// MDU boundaries
    MduBoundary,
    /// Do-not-build boundaries
    DoNotBuild,
    /// Address points
    AddressMaster,
    /// Guys and anchors
    Guys,
}

impl LayerKey {
    /// Every layer key
    pub const ALL: [Self; 16] = [
        Self::FdhBoundary,
        Self::Conduit,
        Self::Structures,
        Self::SpliceEnclosures,
        Self::Cables,
        Self::SlackLoops,
        Self::Strand,
        Self::Poles,
        Self::PassiveCabinets,
        Self::ActiveCabinets,
        Self::Risers,
        Self::Drops,
        Self::MduBoundary,
        Self::DoNotBuild,
        Self::AddressMaster,
        Self::Guys,
    ];

    /// Configuration name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FdhBoundary => "fdh_boundary",
            Self::Conduit => "conduit",
            Self::Structures => "structures",
            Self::SpliceEnclosures => "splice_enclosures",
            Self::Cables => "cables",
            Self::SlackLoops => "slack_loops",
            Self::Strand => "strand",
            Self::Poles => "poles",
            Self::PassiveCabinets => "passive_cabinets",
            Self::ActiveCabinets => "active_cabinets",
            Self::Risers => "risers",
            Self::Drops => "drops",
            Self::MduBoundary => "mdu_boundary",
            Self::DoNotBuild => "do_not_build",
            Self::AddressMaster => "address_master",
            Self::Guys => "guys",
        }
    }

    fn default_item_id(self) -> &'static str {
        match self {
            Self::FdhBoundary => "577f024964b844b7836402bf1f84b01f",
            Self::Conduit => "cd6de7b04ed144fe833317fd7fd7731e",
            Self::Structures => "47f9081030fa4c50a9ea13b12e5a27e8",
            Self::SpliceEnclosures => "65482deab3594b5d9c572b8b41715519",
            Self::Cables => "d8380eadf1514800ba303842456798b1",
            Self::SlackLoops => "8124b9d500c240749221ece33c785763",
            Self::Strand => "a1950b90b7214b30867bd57bb7760626",
            Self::Poles => "bc21b517ca3b4594b27b41ede3b5eb6a",
            Self::PassiveCabinets => "f1bd84729048403fa02153fe1af54bc9",
            Self::ActiveCabinets => "8a42d8a5d7b649109101b15647a2235d",
            Self::Risers => "8f42330d5a264cdca3bd692cc4b268fe",
            Self::Drops => "9f7962eb211a451da43748fd21122911",
            Self::MduBoundary => "54ec733402cc40c3b95415cdf5005a8a",
            Self::DoNotBuild => "1c0e4200a5c84664b8c73ccda21acc08",
            Self::AddressMaster => "dfb329f0de874dbca01eee76133c250d",
            Self::Guys => "3de8975d28034f53a2680d51279bae67",
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layer key → item id
///
/// Always complete: overrides merge onto the built-in ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<LayerKey, LayerId>", into = "BTreeMap<LayerKey, LayerId>")]
pub struct LayerCatalog {
    layers: BTreeMap<LayerKey, LayerId>,
}

impl LayerCatalog {
    /// Catalog with the built-in item ids
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: LayerKey::ALL
                .iter()
                .map(|key| (*key, LayerId::new(key.default_item_id())))
                .collect(),
        }
    }

    /// With an overridden item id
    #[inline]
    #[must_use]
    pub fn with_layer(mut self, key: LayerKey, id: impl Into<String>) -> Self {
        self.layers.insert(key, LayerId::new(id));
        self
    }

    /// Item id for a layer
    #[must_use]
    pub fn get(&self, key: LayerKey) -> LayerId {
        self.layers
            .get(&key)
            .cloned()
            .unwrap_or_else(|| LayerId::new(key.default_item_id()))
    }

    /// Iterate entries
    pub fn iter(&self) -> impl Iterator<Item = (LayerKey, &LayerId)> {
        self.layers.iter().map(|(key, id)| (*key, id))
    }
}

impl Default for LayerCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<LayerKey, LayerId>> for LayerCatalog {
    fn from(overrides: BTreeMap<LayerKey, LayerId>) -> Self {
        let mut catalog = Self::new();
        catalog.layers.extend(overrides);
        catalog
    }
}

impl From<LayerCatalog> for BTreeMap<LayerKey, LayerId> {
    fn from(catalog: LayerCatalog) -> Self {
        catalog.layers
    }
}
