//! Clientes de servicios externos
//!
//! Por ahora solo el asset host donde se suben las fotos de los
//! propietarios y donde viven las tarjetas alojadas de registros
//! antiguos.

pub mod asset_host;

pub use asset_host::{public_ref_from_url, AssetHost, AssetRef, HostedAssetClient, MemoryAssetHost};
