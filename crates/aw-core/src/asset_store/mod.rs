//! In-memory asset store.
//!
//! The store has a two-phase lifecycle: an [`AssetStoreBuilder`] is filled
//! during startup population, then frozen with [`AssetStoreBuilder::build`]
//! into an [`AssetStore`] snapshot that only exposes read operations.

mod sequence;

pub use sequence::IdSequence;

use crate::catalog::AddressCatalog;
use crate::generator::AssetGenerator;
use crate::models::{Asset, AssetId, BusinessUnit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading, populating or querying the store.
#[derive(Error, Debug)]
pub enum AssetStoreError {
    /// The address source is missing, unreadable or malformed.
    #[error("Data load error: {0}")]
    DataLoad(String),
    /// Population cannot run with the given configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A query argument does not name a known value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Two writers tried to insert under the same id.
    #[error("Duplicate asset id: {0}")]
    DuplicateId(AssetId),
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for asset store operations.
pub type AssetStoreResult<T> = Result<T, AssetStoreError>;

/// Mutable population-phase store.
#[derive(Debug, Default)]
pub struct AssetStoreBuilder {
    generator: AssetGenerator,
    ids: IdSequence,
    assets: HashMap<AssetId, Asset>,
}

impl AssetStoreBuilder {
    /// Creates an empty builder using the default activation window.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id counter used by this builder.
    pub fn ids(&self) -> &IdSequence {
        &self.ids
    }

    /// Number of assets inserted so far.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Inserts a single asset, rejecting an id that is already present.
    pub fn insert(&mut self, asset: Asset) -> AssetStoreResult<()> {
        if self.assets.contains_key(&asset.id) {
            return Err(AssetStoreError::DuplicateId(asset.id));
        }
        self.assets.insert(asset.id, asset);
        Ok(())
    }

    /// Generates `count_per_unit` assets for every business unit.
    ///
    /// Rounds are interleaved: each round generates one asset per unit in
    /// [`BusinessUnit::ALL`] order, so ids are assigned round-robin across
    /// units. With a seeded `rng` the result is fully reproducible.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        count_per_unit: usize,
        catalog: &AddressCatalog,
        rng: &mut R,
    ) -> AssetStoreResult<()> {
        check_population(count_per_unit, catalog)?;

        let start = Instant::now();
        info!(count_per_unit, "Populating in-memory asset store");

        for _ in 0..count_per_unit {
            for unit in BusinessUnit::ALL {
                let id = self.ids.next();
                let asset = self
                    .generator
                    .generate(id, unit, catalog.addresses_for(unit), rng)?;
                self.insert(asset)?;
            }
        }

        info!(
            total = self.assets.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "In-memory asset store populated"
        );
        Ok(())
    }

    /// Generates `count_per_unit` assets for every business unit with one
    /// worker thread per unit.
    ///
    /// Each worker draws from its own `StdRng` derived from `seed` and the
    /// unit, and allocates ids from the shared [`IdSequence`]. Attribute
    /// values per unit are reproducible for a given seed; which ids they
    /// land on depends on thread scheduling.
    pub fn populate_concurrent(
        &mut self,
        count_per_unit: usize,
        catalog: &AddressCatalog,
        seed: u64,
    ) -> AssetStoreResult<()> {
        check_population(count_per_unit, catalog)?;

        let start = Instant::now();
        info!(
            count_per_unit,
            workers = BusinessUnit::ALL.len(),
            "Populating in-memory asset store concurrently"
        );

        let generator = self.generator;
        let ids = &self.ids;
        let batches: Vec<AssetStoreResult<Vec<Asset>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = BusinessUnit::ALL
                .iter()
                .map(|&unit| {
                    let pool = catalog.addresses_for(unit);
                    scope.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(derive_unit_seed(seed, unit));
                        (0..count_per_unit)
                            .map(|_| generator.generate(ids.next(), unit, pool, &mut rng))
                            .collect::<AssetStoreResult<Vec<Asset>>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(AssetStoreError::Internal(
                            "Population worker panicked".to_string(),
                        ))
                    })
                })
                .collect()
        });

        for batch in batches {
            let batch = batch?;
            debug!(generated = batch.len(), "Merging population batch");
            for asset in batch {
                self.insert(asset)?;
            }
        }

        info!(
            total = self.assets.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "In-memory asset store populated"
        );
        Ok(())
    }

    /// Freezes the builder into a read-only snapshot.
    pub fn build(self) -> AssetStore {
        let mut by_unit: HashMap<BusinessUnit, Vec<AssetId>> = HashMap::new();
        let assets: BTreeMap<AssetId, Asset> = self.assets.into_iter().collect();
        for asset in assets.values() {
            by_unit.entry(asset.business_unit).or_default().push(asset.id);
        }
        AssetStore { assets, by_unit }
    }
}

/// Read-only snapshot of the populated store.
///
/// There is no mutation API; the snapshot can be shared behind an `Arc` and
/// queried from any number of tasks without coordination.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: BTreeMap<AssetId, Asset>,
    by_unit: HashMap<BusinessUnit, Vec<AssetId>>,
}

impl AssetStore {
    /// Every stored asset, in ascending id order.
    pub fn find_all(&self) -> Vec<Asset> {
        self.assets.values().cloned().collect()
    }

    /// The asset with `id`, if one was ever assigned.
    pub fn find_by_id(&self, id: AssetId) -> Option<Asset> {
        self.assets.get(&id).cloned()
    }

    /// Every asset belonging to `unit`, in ascending id order.
    pub fn find_by_business_unit(&self, unit: BusinessUnit) -> Vec<Asset> {
        self.by_unit
            .get(&unit)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.assets.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Like [`find_by_business_unit`](Self::find_by_business_unit), taking
    /// the unit as text.
    ///
    /// An unknown unit is an [`AssetStoreError::InvalidArgument`]; a known
    /// unit without assets yields an empty list.
    pub fn find_by_business_unit_name(&self, unit: &str) -> AssetStoreResult<Vec<Asset>> {
        let unit: BusinessUnit = unit
            .parse()
            .map_err(|e: crate::models::UnknownVariant| {
                AssetStoreError::InvalidArgument(e.to_string())
            })?;
        Ok(self.find_by_business_unit(unit))
    }

    /// Number of assets per business unit, including units with none.
    pub fn count_by_business_unit(&self) -> BTreeMap<BusinessUnit, usize> {
        BusinessUnit::ALL
            .iter()
            .map(|unit| (*unit, self.by_unit.get(unit).map(Vec::len).unwrap_or(0)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn check_population(count_per_unit: usize, catalog: &AddressCatalog) -> AssetStoreResult<()> {
    if count_per_unit == 0 {
        return Err(AssetStoreError::Configuration(
            "Asset count per business unit must be a positive integer".to_string(),
        ));
    }
    catalog.ensure_complete()
}

/// SplitMix64-style mixing of the population seed with the unit.
fn derive_unit_seed(seed: u64, unit: BusinessUnit) -> u64 {
    let mut x = seed ^ ((unit as u64 + 1) << 1);
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;
    use std::collections::HashSet;
    use std::sync::Arc;

    const SOURCE: &str = r#"[
        {"addressLine1":"A38 Layby","town":"Plymouth","county":"Devon","postcode":"PL6 8DH","businessUnit":"ROADSIDE"},
        {"addressLine1":"14 London Rd","town":"Brighton","county":"East Sussex","postcode":"BN1 4JF","businessUnit":"ROADSIDE"},
        {"addressLine1":"1 Deansgate","town":"Manchester","county":"Greater Manchester","postcode":"M3 1AZ","businessUnit":"RETAIL"},
        {"addressLine1":"Platform 1","addressLine2":"Waverley Station","town":"Edinburgh","county":"Midlothian","postcode":"EH1 1BB","businessUnit":"TRANSPORT"}
    ]"#;

    fn catalog() -> AddressCatalog {
        AddressCatalog::from_reader(SOURCE.as_bytes()).unwrap()
    }

    fn populated(count: usize, seed: u64) -> AssetStore {
        let mut builder = AssetStoreBuilder::new();
        builder
            .populate(count, &catalog(), &mut StdRng::seed_from_u64(seed))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_populate_counts() {
        let store = populated(5, 1);
        assert_eq!(store.len(), 5 * BusinessUnit::ALL.len());
        assert_eq!(store.find_all().len(), store.len());

        let counts = store.count_by_business_unit();
        assert_eq!(counts.len(), BusinessUnit::ALL.len());
        assert!(counts.values().all(|c| *c == 5));
    }

    #[test]
    fn test_ids_unique_and_sequential() {
        let store = populated(10, 2);
        let ids: Vec<AssetId> = store.find_all().iter().map(|a| a.id).collect();
        let expected: Vec<AssetId> = (0..30).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_find_by_business_unit_partitions_store() {
        let store = populated(4, 3);
        let all: HashSet<AssetId> = store.find_all().iter().map(|a| a.id).collect();

        let mut total = 0;
        for unit in BusinessUnit::ALL {
            let assets = store.find_by_business_unit(unit);
            assert!(assets.iter().all(|a| a.business_unit == unit));
            assert!(assets.iter().all(|a| all.contains(&a.id)));
            total += assets.len();
        }
        assert_eq!(total, store.len());
    }

    #[test]
    fn test_addresses_stay_within_unit_pool() {
        let catalog = catalog();
        let mut builder = AssetStoreBuilder::new();
        builder
            .populate(50, &catalog, &mut StdRng::seed_from_u64(4))
            .unwrap();
        let store = builder.build();

        for asset in store.find_all() {
            let pool = catalog.addresses_for(asset.business_unit);
            assert!(
                pool.iter().any(|a| Arc::ptr_eq(a, &asset.address)),
                "asset {} sited outside its unit",
                asset.id
            );
        }
    }

    #[test]
    fn test_find_by_id() {
        let store = populated(2, 5);
        let first = store.find_all().into_iter().next().unwrap();

        let found = store.find_by_id(first.id).unwrap();
        assert_eq!(found, first);
        assert_eq!(found.address, first.address);
        assert!(store.find_by_id(store.len() as AssetId).is_none());
        assert!(store.find_by_id(AssetId::MAX).is_none());
    }

    #[test]
    fn test_find_by_business_unit_name() {
        let store = populated(3, 6);

        let retail = store.find_by_business_unit_name("RETAIL").unwrap();
        assert_eq!(retail.len(), 3);

        match store.find_by_business_unit_name("BOGUS") {
            Err(AssetStoreError::InvalidArgument(msg)) => assert!(msg.contains("BOGUS")),
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
        assert!(matches!(
            store.find_by_business_unit_name("retail"),
            Err(AssetStoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_known_unit_without_assets_is_empty() {
        let store = AssetStoreBuilder::new().build();
        assert!(store.is_empty());
        assert!(store.find_by_business_unit_name("TRANSPORT").unwrap().is_empty());
        assert!(store.find_all().is_empty());
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = populated(20, 42);
        let b = populated(20, 42);

        for (x, y) in a.find_all().iter().zip(b.find_all().iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.business_unit, y.business_unit);
            assert_eq!(x.activation_date, y.activation_date);
            assert_eq!(x.format, y.format);
            assert_eq!(x.orientation, y.orientation);
            assert_eq!(x.address, y.address);
        }
    }

    #[test]
    fn test_zero_count_is_configuration_error() {
        let mut builder = AssetStoreBuilder::new();
        let result = builder.populate(0, &catalog(), &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(AssetStoreError::Configuration(_))));
    }

    #[test]
    fn test_incomplete_catalog_fails_before_generating() {
        let source = r#"[{"addressLine1":"1 Deansgate","town":"Manchester","county":"Greater Manchester","postcode":"M3 1AZ","businessUnit":"RETAIL"}]"#;
        let catalog = AddressCatalog::from_reader(source.as_bytes()).unwrap();

        let mut builder = AssetStoreBuilder::new();
        let result = builder.populate(3, &catalog, &mut StdRng::seed_from_u64(0));

        assert!(matches!(result, Err(AssetStoreError::Configuration(_))));
        assert!(builder.is_empty());
        assert_eq!(builder.ids().peek(), 0);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut builder = AssetStoreBuilder::new();
        let pool = vec![Arc::new(Address::new("1 Strand", "London", "Greater London", "WC2N 5HR"))];
        let generator = AssetGenerator::default();
        let mut rng = StdRng::seed_from_u64(9);

        let a = generator.generate(7, BusinessUnit::Retail, &pool, &mut rng).unwrap();
        let b = generator.generate(7, BusinessUnit::Transport, &pool, &mut rng).unwrap();

        builder.insert(a).unwrap();
        assert!(matches!(builder.insert(b), Err(AssetStoreError::DuplicateId(7))));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_populate_concurrent() {
        let catalog = catalog();
        let mut builder = AssetStoreBuilder::new();
        builder.populate_concurrent(200, &catalog, 77).unwrap();
        let store = builder.build();

        assert_eq!(store.len(), 200 * BusinessUnit::ALL.len());
        let ids: HashSet<AssetId> = store.find_all().iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), store.len());
        assert_eq!(ids.iter().max().copied(), Some(store.len() as AssetId - 1));

        for unit in BusinessUnit::ALL {
            let assets = store.find_by_business_unit(unit);
            assert_eq!(assets.len(), 200);
            let pool = catalog.addresses_for(unit);
            assert!(assets
                .iter()
                .all(|a| pool.iter().any(|p| Arc::ptr_eq(p, &a.address))));
        }
    }

    #[test]
    fn test_unit_seeds_differ() {
        let seeds: HashSet<u64> = BusinessUnit::ALL
            .iter()
            .map(|u| derive_unit_seed(1, *u))
            .collect();
        assert_eq!(seeds.len(), BusinessUnit::ALL.len());
        assert_eq!(
            derive_unit_seed(1, BusinessUnit::Retail),
            derive_unit_seed(1, BusinessUnit::Retail)
        );
    }
}
