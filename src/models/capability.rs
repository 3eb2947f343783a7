//! Capability identifier enumeration.

use serde::{Deserialize, Serialize};

/// Capability identifiers that can be proposed by the planner and resolved
/// by the capability registry.
///
/// A closed enum (rather than free-form strings) so that unknown
/// identifiers are rejected when a plan is deserialized instead of
/// surfacing as stringly-typed lookup misses deep in step execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CapabilityId {
    /// Geocode a free-form address query.
    #[serde(rename = "geolocation.geocode")]
    GeolocationGeocode,
    /// Search available map layers by keyword.
    #[serde(rename = "layers.search")]
    LayersSearch,
    /// Resolve parcel EGRID identifiers at a coordinate.
    #[serde(rename = "oereb.egridByXY")]
    OerebEgridByXy,
    /// Fetch the cadastral restriction extract for an EGRID.
    #[serde(rename = "oereb.extractById")]
    OerebExtractById,
    /// Resolve an EGRID from a parcel number and municipality.
    #[serde(rename = "featureSearch.getEgridByNumberAndMunicipality")]
    FeatureSearchEgrid,
    /// Geothermal probe feasibility lookup at a coordinate.
    #[serde(rename = "processing.getGeothermalBoreInfoByXY")]
    GeothermalBoreInfoByXy,
    /// Land-register plan PDF generation for an EGRID.
    #[serde(rename = "processing.getCadastralPlanByEgrid")]
    CadastralPlanByEgrid,
}

impl CapabilityId {
    /// Stable dotted identifier, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GeolocationGeocode => "geolocation.geocode",
            Self::LayersSearch => "layers.search",
            Self::OerebEgridByXy => "oereb.egridByXY",
            Self::OerebExtractById => "oereb.extractById",
            Self::FeatureSearchEgrid => "featureSearch.getEgridByNumberAndMunicipality",
            Self::GeothermalBoreInfoByXy => "processing.getGeothermalBoreInfoByXY",
            Self::CadastralPlanByEgrid => "processing.getCadastralPlanByEgrid",
        }
    }
}

impl std::fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
