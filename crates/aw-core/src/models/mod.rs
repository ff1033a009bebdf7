//! Data models for the address catalog and the synthetic asset store.

mod address;
mod asset;

pub use address::{Address, AddressRecord};
pub use asset::{
    Asset, AssetFormat, AssetId, AssetOrientation, BusinessUnit, UnknownVariant, REFERENCE_TZ,
};
