//! Address catalog: the business-unit partitioned address templates that
//! synthetic assets are sited at.

use crate::asset_store::{AssetStoreError, AssetStoreResult};
use crate::models::{Address, AddressRecord, BusinessUnit};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable mapping from business unit to its ordered address pool.
#[derive(Debug, Clone, Default)]
pub struct AddressCatalog {
    by_unit: BTreeMap<BusinessUnit, Vec<Arc<Address>>>,
}

impl AddressCatalog {
    /// Loads the catalog from a JSON file of [`AddressRecord`]s.
    pub fn load(path: impl AsRef<Path>) -> AssetStoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading address templates");
        let file = std::fs::File::open(path).map_err(|e| {
            AssetStoreError::DataLoad(format!(
                "Failed to open address source {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Loads the catalog from any reader producing a JSON array of records.
    pub fn from_reader<R: Read>(reader: R) -> AssetStoreResult<Self> {
        let records: Vec<AddressRecord> = serde_json::from_reader(reader).map_err(|e| {
            AssetStoreError::DataLoad(format!("Failed to parse address source: {}", e))
        })?;
        Self::from_records(records)
    }

    /// Builds the catalog from already parsed records.
    ///
    /// Fails on the first record whose business unit tag is unknown; nothing
    /// is kept from a source that fails.
    pub fn from_records(records: Vec<AddressRecord>) -> AssetStoreResult<Self> {
        let mut by_unit: BTreeMap<BusinessUnit, Vec<Arc<Address>>> = BTreeMap::new();

        for (index, record) in records.into_iter().enumerate() {
            let unit: BusinessUnit = record.business_unit.parse().map_err(|e| {
                AssetStoreError::DataLoad(format!("Address record [{}]: {}", index, e))
            })?;
            by_unit
                .entry(unit)
                .or_default()
                .push(Arc::new(record.address));
        }

        let catalog = Self { by_unit };
        debug!(
            addresses = catalog.len(),
            units = catalog.by_unit.len(),
            "Address catalog loaded"
        );
        Ok(catalog)
    }

    /// Addresses registered for `unit`, in source order. Empty when none.
    pub fn addresses_for(&self, unit: BusinessUnit) -> &[Arc<Address>] {
        self.by_unit.get(&unit).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Business units that have at least one address.
    pub fn units(&self) -> impl Iterator<Item = BusinessUnit> + '_ {
        self.by_unit.keys().copied()
    }

    /// Total number of addresses across all units.
    pub fn len(&self) -> usize {
        self.by_unit.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every business unit has at least one address.
    pub fn ensure_complete(&self) -> AssetStoreResult<()> {
        match BusinessUnit::ALL
            .iter()
            .find(|unit| self.addresses_for(**unit).is_empty())
        {
            Some(unit) => Err(AssetStoreError::Configuration(format!(
                "No addresses configured for business unit {}",
                unit
            ))),
            None => Ok(()),
        }
    }
}
