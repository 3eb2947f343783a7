//! Thematic layer search capability backed by a dataproduct search API.

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

/// Filter restricting hits to map dataproducts.
const DATAPRODUCT_FILTER: &str = "dataproduct";

/// Maximum number of hits requested per query.
const DEFAULT_LIMIT: u32 = 20;

/// WMS request parameters carried in every produced layer source.
const WMS_FORMAT: &str = "image/png";
const WMS_VERSION: &str = "1.3.0";
const LAYER_CRS: &str = "EPSG:2056";

/// Finds thematic map layers through a dataproduct search endpoint.
pub struct LayerSearchCapability {
    http: reqwest::Client,
    search_url: String,
    wms_url: String,
}

impl LayerSearchCapability {
    /// Create a layer search against the given search and WMS endpoints.
    #[must_use]
    pub fn new(search_url: impl Into<String>, wms_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            search_url: search_url.into(),
            wms_url: wms_url.into(),
        }
    }

    /// Descriptor used for registration and planner documentation.
    #[must_use]
    pub fn descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor {
            id: CapabilityId::LayersSearch,
            description: "Finds thematic map layers by topic keyword.".to_owned(),
            params: vec![ParamDescriptor {
                name: "q".to_owned(),
                description: "Topic keyword, without generic words like 'map' or 'layer'"
                    .to_owned(),
                required: true,
                schema: Some("{ 'q': 'string - topic keyword' }".to_owned()),
            }],
        }
    }

    async fn search(&self, args: Record) -> Result<CapabilityResult> {
        let query = item::field_as_string(&args, "q").unwrap_or_default();
        debug!(query = %query, "layer search called");

        if query.trim().is_empty() {
            return Ok(CapabilityResult::error("Parameter 'q' must not be empty."));
        }

        let response = self
            .http
            .get(&self.search_url)
            .query(&[
                ("filter", DATAPRODUCT_FILTER),
                ("limit", &DEFAULT_LIMIT.to_string()),
                ("searchtext", &query),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let items = self.map_results(body.get("results"));

        if items.is_empty() {
            return Ok(CapabilityResult::error("No matching layers found."));
        }
        let message = format!("{} layer(s) found.", items.len());
        if items.len() > 1 {
            return Ok(CapabilityResult::needs_user_choice(items, message));
        }
        Ok(CapabilityResult::ok(items, message))
    }

    fn map_results(&self, results: Option<&Value>) -> Vec<Record> {
        let Some(Value::Array(results)) = results else {
            return Vec::new();
        };
        results
            .iter()
            .filter_map(|result| result.get("dataproduct"))
            .filter_map(|dataproduct| self.item_from_dataproduct(dataproduct))
            .collect()
    }

    /// Map one dataproduct hit to a result item. Layer groups keep their
    /// member layers under `sublayers` so a group loads as a whole.
    fn item_from_dataproduct(&self, dataproduct: &Value) -> Option<Record> {
        let id = dataproduct.get("dataproduct_id").and_then(Value::as_str)?;
        let label = dataproduct
            .get("display")
            .and_then(Value::as_str)
            .unwrap_or(id);
        let kind = dataproduct.get("type").and_then(Value::as_str).unwrap_or("");

        let payload = if kind == "layergroup" {
            let sublayers: Vec<Value> = dataproduct
                .get("sublayers")
                .and_then(Value::as_array)
                .map(|sublayers| {
                    sublayers
                        .iter()
                        .filter_map(|sublayer| self.layer_payload(sublayer))
                        .map(Value::Object)
                        .collect()
                })
                .unwrap_or_default();
            if sublayers.is_empty() {
                return None;
            }
            json!({ "id": id, "label": label, "sublayers": sublayers })
        } else {
            Value::Object(self.layer_payload(dataproduct)?)
        };

        match json!({ "id": id, "label": label, "payload": payload }) {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn layer_payload(&self, dataproduct: &Value) -> Option<Record> {
        let id = dataproduct.get("dataproduct_id").and_then(Value::as_str)?;
        let label = dataproduct
            .get("display")
            .and_then(Value::as_str)
            .unwrap_or(id);

        let payload = json!({
            "id": id,
            "label": label,
            "layerId": id,
            "type": "wms",
            "crs": LAYER_CRS,
            "source": {
                "url": self.wms_url,
                "LAYERS": id,
                "FORMAT": WMS_FORMAT,
                "VERSION": WMS_VERSION,
                "TRANSPARENT": true,
                "CRS": LAYER_CRS,
            },
        });
        match payload {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl Capability for LayerSearchCapability {
    fn invoke(
        &self,
        args: Record,
    ) -> Pin<Box<dyn Future<Output = Result<CapabilityResult>> + Send + '_>> {
        Box::pin(self.search(args))
    }
}

/// Convenience: register this capability on a registry.
pub fn register(
    registry: &mut crate::registry::CapabilityRegistry,
    search_url: &str,
    wms_url: &str,
) {
    registry.register(
        LayerSearchCapability::descriptor(),
        Arc::new(LayerSearchCapability::new(search_url, wms_url)),
    );
}
