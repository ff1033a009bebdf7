//! Synthetic asset data model.

use super::Address;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Numeric asset identifier, allocated by [`IdSequence`](crate::IdSequence).
pub type AssetId = u64;

/// Time zone activation dates are expressed in, regardless of the host zone.
pub const REFERENCE_TZ: Tz = chrono_tz::Europe::London;

/// A text value did not name any variant of a closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind}: {value}. Must be one of: {expected}")]
pub struct UnknownVariant {
    /// Name of the enumeration (e.g. "business unit").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma separated list of accepted values.
    pub expected: String,
}

/// A synthetic asset record.
///
/// Identity is the `id` alone: two assets with identical attributes but
/// different ids are distinct, and equality ignores every other field.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Unique, never reused identifier.
    pub id: AssetId,
    /// Business unit the asset belongs to.
    pub business_unit: BusinessUnit,
    /// Activation timestamp in [`REFERENCE_TZ`].
    pub activation_date: DateTime<Tz>,
    /// Physical format.
    pub format: AssetFormat,
    /// Physical orientation.
    pub orientation: AssetOrientation,
    /// Site address, shared with the catalog entry it was drawn from.
    pub address: Arc<Address>,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Organisational unit partitioning both address templates and assets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessUnit {
    /// Roadside and high-street sites.
    Roadside,
    /// Shopping centres and retail parks.
    Retail,
    /// Rail, bus and airport sites.
    Transport,
}

impl BusinessUnit {
    /// Every business unit, in declaration order.
    pub const ALL: [BusinessUnit; 3] = [
        BusinessUnit::Roadside,
        BusinessUnit::Retail,
        BusinessUnit::Transport,
    ];

    /// Wire name, as used in the address source and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessUnit::Roadside => "ROADSIDE",
            BusinessUnit::Retail => "RETAIL",
            BusinessUnit::Transport => "TRANSPORT",
        }
    }
}

impl std::fmt::Display for BusinessUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessUnit {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROADSIDE" => Ok(BusinessUnit::Roadside),
            "RETAIL" => Ok(BusinessUnit::Retail),
            "TRANSPORT" => Ok(BusinessUnit::Transport),
            _ => Err(UnknownVariant {
                kind: "business unit",
                value: s.to_string(),
                expected: join_names(BusinessUnit::ALL.iter().map(|u| u.as_str())),
            }),
        }
    }
}

/// Poster format of an asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetFormat {
    /// 6-sheet panel.
    Sheet6,
    /// 48-sheet billboard.
    Sheet48,
    /// 96-sheet billboard.
    Sheet96,
    /// Digital screen.
    Digital,
}

impl AssetFormat {
    /// Every format, in declaration order.
    pub const ALL: [AssetFormat; 4] = [
        AssetFormat::Sheet6,
        AssetFormat::Sheet48,
        AssetFormat::Sheet96,
        AssetFormat::Digital,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFormat::Sheet6 => "SHEET6",
            AssetFormat::Sheet48 => "SHEET48",
            AssetFormat::Sheet96 => "SHEET96",
            AssetFormat::Digital => "DIGITAL",
        }
    }
}

impl std::fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHEET6" => Ok(AssetFormat::Sheet6),
            "SHEET48" => Ok(AssetFormat::Sheet48),
            "SHEET96" => Ok(AssetFormat::Sheet96),
            "DIGITAL" => Ok(AssetFormat::Digital),
            _ => Err(UnknownVariant {
                kind: "asset format",
                value: s.to_string(),
                expected: join_names(AssetFormat::ALL.iter().map(|f| f.as_str())),
            }),
        }
    }
}

/// Orientation of an asset's display surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetOrientation {
    Landscape,
    Portrait,
}

impl AssetOrientation {
    /// Every orientation, in declaration order.
    pub const ALL: [AssetOrientation; 2] = [AssetOrientation::Landscape, AssetOrientation::Portrait];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetOrientation::Landscape => "LANDSCAPE",
            AssetOrientation::Portrait => "PORTRAIT",
        }
    }
}

impl std::fmt::Display for AssetOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetOrientation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LANDSCAPE" => Ok(AssetOrientation::Landscape),
            "PORTRAIT" => Ok(AssetOrientation::Portrait),
            _ => Err(UnknownVariant {
                kind: "asset orientation",
                value: s.to_string(),
                expected: join_names(AssetOrientation::ALL.iter().map(|o| o.as_str())),
            }),
        }
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
