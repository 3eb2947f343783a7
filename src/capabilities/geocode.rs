//! Address geocoding capability backed by a feature search HTTP API.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::models::capability::CapabilityId;
use crate::models::item::{self, Record};
use crate::models::plan::CapabilityResult;
use crate::registry::{Capability, CapabilityDescriptor, ParamDescriptor};
use crate::Result;

/// Dataset filter restricting hits to building addresses.
const ADDRESS_FILTER: &str = "ch.so.agi.av.gebaeudeadressen.gebaeudeeingaenge";

/// Maximum number of hits requested per query.
const DEFAULT_LIMIT: u32 = 25;

/// Geocoder for addresses using a feature search endpoint.
pub struct GeocodeCapability {
    http: reqwest::Client,
    search_url: String,
}

impl GeocodeCapability {
    /// Create a geocoder against the given search endpoint.
    #[must_use]
    pub fn new(search_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            search_url: search_url.into(),
        }
    }

    /// Descriptor used for registration and planner documentation.
    #[must_use]
    pub fn descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor {
            id: CapabilityId::GeolocationGeocode,
            description: "Geocoder for addresses using the cantonal search API.".to_owned(),
            params: vec![ParamDescriptor {
                name: "q".to_owned(),
                description: "Query string that represents an address".to_owned(),
                required: true,
                schema: Some("{ 'q': 'string - full address query' }".to_owned()),
            }],
        }
    }

    async fn geocode(&self, args: Record) -> Result<CapabilityResult> {
        let query = item::field_as_string(&args, "q").unwrap_or_default();
        debug!(query = %query, "geocode called");

        if query.trim().is_empty() {
            return Ok(CapabilityResult::error("Parameter 'q' must not be empty."));
        }

        let response = self
            .http
            .get(&self.search_url)
            .query(&[
                ("filter", ADDRESS_FILTER),
                ("limit", &DEFAULT_LIMIT.to_string()),
                ("searchtext", &query),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let mut items = map_results(body.get("results"));

        let exact = filter_exact_matches(&query, &items);
        if !exact.is_empty() {
            items = exact;
        }

        if items.is_empty() {
            return Ok(CapabilityResult::error("No matches found."));
        }
        let message = format!("{} match(es) found.", items.len());
        if items.len() > 1 {
            return Ok(CapabilityResult::needs_user_choice(items, message));
        }
        Ok(CapabilityResult::ok(items, message))
    }
}

impl Capability for GeocodeCapability {
    fn invoke(
        &self,
        args: Record,
    ) -> Pin<Box<dyn Future<Output = Result<CapabilityResult>> + Send + '_>> {
        Box::pin(self.geocode(args))
    }
}

fn map_results(results: Option<&Value>) -> Vec<Record> {
    let Some(Value::Array(results)) = results else {
        return Vec::new();
    };
    results
        .iter()
        .filter_map(|result| result.get("feature"))
        .filter_map(item_from_feature)
        .collect()
}

fn item_from_feature(feature: &Value) -> Option<Record> {
    let id = feature.get("feature_id").and_then(Value::as_str)?;
    let srid = feature.get("srid").and_then(Value::as_str)?;
    let label = sanitize_label(feature.get("display").and_then(Value::as_str).unwrap_or(""));
    let Some(Value::Array(bbox)) = feature.get("bbox") else {
        return None;
    };
    if label.is_empty() || bbox.is_empty() {
        return None;
    }

    let coord: Vec<Value> = bbox.clone();
    match json!({ "id": id, "label": label, "coord": coord, "crs": srid }) {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Prefer hits whose street-and-number part exactly matches the query.
fn filter_exact_matches(query: &str, items: &[Record]) -> Vec<Record> {
    let normalized_query = normalize_street_and_number(query);
    if normalized_query.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|candidate| {
            item::field_as_string(candidate, "label")
                .is_some_and(|label| normalize_street_and_number(&label) == normalized_query)
        })
        .cloned()
        .collect()
}

fn sanitize_label(display: &str) -> String {
    let label = display.replace("(Adresse)", "");
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Street and house number before the first comma, whitespace-collapsed
/// and lowercased.
fn normalize_street_and_number(input: &str) -> String {
    let base = input.split(',').next().unwrap_or("");
    base.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Convenience: register this capability on a registry.
pub fn register(registry: &mut crate::registry::CapabilityRegistry, search_url: &str) {
    registry.register(
        GeocodeCapability::descriptor(),
        Arc::new(GeocodeCapability::new(search_url)),
    );
}
