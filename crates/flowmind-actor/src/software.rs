//! The software actor adapter (§4.3).

use async_trait::async_trait;
use flowmind_error::{FlowmindError, Result};
use flowmind_workflow::model::Program;
use serde_json::{json, Value};

use crate::adapter::ActorAdapter;
use crate::request::{base_outputs, ActorRequest};

/// Synthesizes a REST call when the activity declares a `rest_endpoint`
/// program; otherwise passes inputs through unchanged.
pub struct SoftwareActor {
    http: reqwest::Client,
}

impl SoftwareActor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn call_rest_endpoint(&self, program: &Program, inputs: &Value) -> Result<Value> {
        let url = program
            .config
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| FlowmindError::config("rest_endpoint program is missing `url`"))?;
        let method: reqwest::Method = program
            .config
            .get("method")
            .and_then(Value::as_str)
            .and_then(|m| m.parse().ok())
            .unwrap_or(reqwest::Method::POST);

        let response = self
            .http
            .request(method, url)
            .json(inputs)
            .send()
            .await
            .map_err(|e| FlowmindError::integration(format!("rest_endpoint call to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let data = response.json::<Value>().await.unwrap_or(Value::Null);

        let mut outputs = base_outputs(inputs);
        outputs.insert("status".to_string(), json!(status));

        // A response shaped like `{"_flow": "skip", "reason": ...}` opts the
        // program into flow control (§11) instead of being nested under
        // `data`, where the engine would never see it.
        if is_flow_skip(&data) {
            if let Value::Object(flow_fields) = data {
                outputs.extend(flow_fields);
            }
        } else {
            outputs.insert("data".to_string(), data);
        }

        Ok(Value::Object(outputs))
    }
}

/// True when `value` is an object declaring `{"_flow": "skip"}` (§11
/// supplemented flow control, grounded in the teacher's `Skip`/`Branch`
/// action-result vocabulary).
fn is_flow_skip(value: &Value) -> bool {
    value.get("_flow").and_then(Value::as_str) == Some("skip")
}

impl Default for SoftwareActor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActorAdapter for SoftwareActor {
    async fn execute(&self, request: ActorRequest<'_>) -> Result<Value> {
        if let Some(program) = request
            .activity
            .programs
            .iter()
            .find(|program| program.kind == "rest_endpoint")
        {
            return self.call_rest_endpoint(program, &request.inputs).await;
        }

        let mut outputs = base_outputs(&request.inputs);
        outputs.insert("status".to_string(), json!("success"));
        outputs.insert(
            "message".to_string(),
            json!(format!("{} completed", request.activity.name)),
        );
        Ok(Value::Object(outputs))
    }
}
