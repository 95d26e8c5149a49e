//! DOM operations for CDP page session.

use serde_json::json;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Node id of the document root. Chrome invalidates every earlier id on
    /// each call, so callers cache it.
    pub async fn get_document(&self) -> Result<i64, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;

        result["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing root nodeId".to_string()))
    }

    /// Query selector all under `node_id`.
    pub async fn query_selector_all(&self, node_id: i64, selector: &str) -> Result<Vec<i64>, CdpError> {
        let result = self
            .call(
                "DOM.querySelectorAll",
                Some(json!({
                    "nodeId": node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_ids: Vec<i64> = result["nodeIds"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default();

        Ok(node_ids)
    }

    /// Attributes as a flat `[name, value, name, value, ...]` list.
    pub async fn get_attributes(&self, node_id: i64) -> Result<Vec<String>, CdpError> {
        let result = self
            .call("DOM.getAttributes", Some(json!({"nodeId": node_id})))
            .await?;

        Ok(result["attributes"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Resolve a node id to a remote object id.
    pub async fn resolve_node(&self, node_id: i64) -> Result<String, CdpError> {
        let result = self
            .call("DOM.resolveNode", Some(json!({"nodeId": node_id})))
            .await?;

        result["object"]["objectId"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing objectId".to_string()))
    }

    /// Push a remote node object into the DOM agent and return its node id.
    pub async fn request_node(&self, object_id: &str) -> Result<i64, CdpError> {
        let result = self
            .call("DOM.requestNode", Some(json!({"objectId": object_id})))
            .await?;

        match result["nodeId"].as_i64() {
            Some(id) if id != 0 => Ok(id),
            _ => Err(CdpError::InvalidResponse("Missing nodeId".to_string())),
        }
    }
}
