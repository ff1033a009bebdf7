//! # aw-core
//!
//! Core data model and in-memory store for Asset Warden.
//!
//! This crate loads the business-unit partitioned address catalog, generates
//! synthetic assets from it with an injected randomness source, and serves
//! read-only queries over the populated snapshot.

pub mod asset_store;
pub mod catalog;
pub mod generator;
pub mod models;

pub use asset_store::{
    AssetStore, AssetStoreBuilder, AssetStoreError, AssetStoreResult, IdSequence,
};
pub use catalog::AddressCatalog;
pub use generator::{ActivationWindow, AssetGenerator};
pub use models::{
    Address, AddressRecord, Asset, AssetFormat, AssetId, AssetOrientation, BusinessUnit,
    UnknownVariant, REFERENCE_TZ,
};
