//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::RemoteObject;

use super::core::PageSession;

fn exception_text(result: &Value) -> Option<String> {
    let exception = result.get("exceptionDetails")?;
    let text = exception["exception"]["description"]
        .as_str()
        .or_else(|| exception["text"].as_str())
        .unwrap_or("Unknown error");
    Some(text.to_string())
}

impl PageSession {
    /// Evaluate JavaScript expression.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(text) = exception_text(&result) {
            return Err(CdpError::JavaScript(text));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Call function on remote object, returning its result by value.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Option<Vec<Value>>,
    ) -> Result<Value, CdpError> {
        let remote = self.call_function(object_id, function, args, true).await?;
        Ok(remote.value.unwrap_or(Value::Null))
    }

    /// Call function on remote object, returning the result as a handle.
    pub async fn call_function_on_raw(
        &self,
        object_id: &str,
        function: &str,
        args: Option<Vec<Value>>,
    ) -> Result<RemoteObject, CdpError> {
        self.call_function(object_id, function, args, false).await
    }

    async fn call_function(
        &self,
        object_id: &str,
        function: &str,
        args: Option<Vec<Value>>,
        by_value: bool,
    ) -> Result<RemoteObject, CdpError> {
        let mut params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "returnByValue": by_value,
            "awaitPromise": true,
        });

        if let Some(a) = args {
            params["arguments"] = json!(a.into_iter().map(|v| json!({"value": v})).collect::<Vec<_>>());
        }

        let result = self.call("Runtime.callFunctionOn", Some(params)).await?;

        if let Some(text) = exception_text(&result) {
            return Err(CdpError::JavaScript(text));
        }

        let remote: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote)
    }

    /// Expose `window[name](payload)` to the page; calls arrive as
    /// `Runtime.bindingCalled` events.
    pub async fn add_binding(&self, name: &str) -> Result<(), CdpError> {
        self.call("Runtime.addBinding", Some(json!({"name": name})))
            .await?;
        Ok(())
    }

    /// Let the page collect a remote object.
    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("Runtime.releaseObject", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }
}
