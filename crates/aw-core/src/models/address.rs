//! Address templates used to place synthetic assets.

use serde::{Deserialize, Serialize};

/// A postal address an asset can be sited at.
///
/// Addresses are owned by the [`AddressCatalog`](crate::AddressCatalog) and
/// shared with generated assets behind an `Arc`, never copied per asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// First address line (building and street).
    pub address_line1: String,
    /// Optional second address line.
    #[serde(default)]
    pub address_line2: Option<String>,
    /// Post town.
    pub town: String,
    /// County.
    pub county: String,
    /// Postcode.
    pub postcode: String,
}

impl Address {
    /// Creates an address without a second line.
    pub fn new(
        address_line1: impl Into<String>,
        town: impl Into<String>,
        county: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Self {
        Self {
            address_line1: address_line1.into(),
            address_line2: None,
            town: town.into(),
            county: county.into(),
            postcode: postcode.into(),
        }
    }

    /// Sets the second address line.
    pub fn with_line2(mut self, line2: impl Into<String>) -> Self {
        self.address_line2 = Some(line2.into());
        self
    }
}

/// One flat entry of the address-template source file.
///
/// The business unit is kept as raw text so that an unknown tag can be
/// reported with its position instead of failing inside the JSON parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(flatten)]
    pub address: Address,
    pub business_unit: String,
}
