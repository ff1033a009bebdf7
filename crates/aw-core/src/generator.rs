//! Synthetic asset generation.

use crate::asset_store::{AssetStoreError, AssetStoreResult};
use crate::models::{
    Address, Asset, AssetFormat, AssetId, AssetOrientation, BusinessUnit, REFERENCE_TZ,
};
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use std::sync::Arc;

/// 2000-01-01T00:00:00Z in epoch milliseconds.
const DEFAULT_WINDOW_START_MILLIS: i64 = 946_684_800_000;
/// 2021-01-01T00:00:00Z in epoch milliseconds.
const DEFAULT_WINDOW_END_MILLIS: i64 = 1_609_459_200_000;

/// Half-open range `[start, end)` activation instants are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ActivationWindow {
    /// Creates a window; `start` must be strictly before `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AssetStoreResult<Self> {
        if start >= end {
            return Err(AssetStoreError::Configuration(format!(
                "Activation window is empty: {} is not before {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `instant` falls inside the window.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let instant = instant.with_timezone(&Utc);
        self.start <= instant && instant < self.end
    }
}

impl Default for ActivationWindow {
    /// 2000-01-01T00:00:00Z (inclusive) to 2021-01-01T00:00:00Z (exclusive).
    fn default() -> Self {
        Self {
            start: DateTime::<Utc>::from_timestamp_millis(DEFAULT_WINDOW_START_MILLIS)
                .expect("window start is a valid timestamp"),
            end: DateTime::<Utc>::from_timestamp_millis(DEFAULT_WINDOW_END_MILLIS)
                .expect("window end is a valid timestamp"),
        }
    }
}

/// Produces one synthetic asset per call from an injected randomness source.
///
/// The generator holds no mutable state; the only side effect of
/// [`generate`](Self::generate) is advancing `rng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetGenerator {
    window: ActivationWindow,
}

impl AssetGenerator {
    pub fn new(window: ActivationWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> ActivationWindow {
        self.window
    }

    /// Generates the asset `id` for `business_unit`, sited at an address
    /// drawn uniformly from `pool`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        id: AssetId,
        business_unit: BusinessUnit,
        pool: &[Arc<Address>],
        rng: &mut R,
    ) -> AssetStoreResult<Asset> {
        if pool.is_empty() {
            return Err(AssetStoreError::Configuration(format!(
                "No addresses available for business unit {}",
                business_unit
            )));
        }

        let address = Arc::clone(&pool[rng.gen_range(0..pool.len())]);
        let format = AssetFormat::ALL[rng.gen_range(0..AssetFormat::ALL.len())];
        let orientation = AssetOrientation::ALL[rng.gen_range(0..AssetOrientation::ALL.len())];

        let millis = rng.gen_range(
            self.window.start.timestamp_millis()..self.window.end.timestamp_millis(),
        );
        let activation = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            AssetStoreError::Configuration(format!("Activation instant {} out of range", millis))
        })?;

        Ok(Asset {
            id,
            business_unit,
            activation_date: activation.with_timezone(&REFERENCE_TZ),
            format,
            orientation,
            address,
        })
    }
}
