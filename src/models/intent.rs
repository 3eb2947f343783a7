//! Intent enumeration shared by the planner and the action templater.

use serde::{Deserialize, Serialize};

/// Intents the planner can emit and the action templater understands.
///
/// Serialized as the snake_case identifiers used in the planner system
/// prompt (e.g. `"goto_address"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    /// Center the map on a geocoded address and drop a marker.
    GotoAddress,
    /// Add a thematic map layer.
    LoadLayer,
    /// Locate a named place (city, mountain, lake).
    SearchPlace,
    /// Produce a cadastral public-law restriction extract for a parcel.
    OerebExtract,
    /// Assess geothermal probe feasibility at a coordinate.
    GeothermalProbeAssessment,
    /// Generate a land-register plan PDF for a parcel.
    CadastralPlan,
}

impl IntentType {
    /// Stable string identifier, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GotoAddress => "goto_address",
            Self::LoadLayer => "load_layer",
            Self::SearchPlace => "search_place",
            Self::OerebExtract => "oereb_extract",
            Self::GeothermalProbeAssessment => "geothermal_probe_assessment",
            Self::CadastralPlan => "cadastral_plan",
        }
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
