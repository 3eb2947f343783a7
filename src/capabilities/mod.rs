//! Built-in capability implementations registered at startup.
//!
//! Each capability wraps one external HTTP service and normalizes its
//! reply into the engine's result shape. Capabilities without a built-in
//! implementation here are expected to be registered by embedding code.

pub mod geocode;
pub mod layer_search;

pub use geocode::GeocodeCapability;
pub use layer_search::LayerSearchCapability;

use crate::config::GeoConfig;
use crate::registry::CapabilityRegistry;

/// Register every built-in capability with the endpoints from `geo`.
pub fn register_builtins(registry: &mut CapabilityRegistry, geo: &GeoConfig) {
    geocode::register(registry, &geo.search_url);
    layer_search::register(registry, &geo.search_url, &geo.wms_url);
}
