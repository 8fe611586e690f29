//! The AI actor adapter (§4.3): dispatches to an external generative model
//! endpoint, configured per-role and credentialed via `GEMINI_API_KEY` (§6).

use async_trait::async_trait;
use flowmind_error::{FlowmindError, Result};
use flowmind_workflow::model::Control;
use serde_json::{json, Value};

use crate::adapter::ActorAdapter;
use crate::request::ActorRequest;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Calls a Gemini-compatible `generateContent` endpoint.
pub struct AiActor {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint_base: String,
}

impl AiActor {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            endpoint_base: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint_base(mut self, endpoint_base: impl Into<String>) -> Self {
        self.endpoint_base = endpoint_base.into();
        self
    }

    fn compose_system_prompt(&self, request: &ActorRequest<'_>) -> String {
        let mut sections = Vec::new();

        if let Some(role) = request.role {
            if let Some(system_prompt) = &role.system_prompt {
                sections.push(system_prompt.clone());
            } else {
                let mut role_section = format!("You are acting as: {}.", role.name);
                if let Some(description) = &role.description {
                    role_section.push_str(&format!(" {description}"));
                }
                if !role.capabilities.is_empty() {
                    role_section.push_str(&format!(" Capabilities: {}.", role.capabilities.join(", ")));
                }
                sections.push(role_section);
            }
        }

        let mut activity_section = format!("Task: {}.", request.activity.name);
        if let Some(description) = &request.activity.description {
            activity_section.push_str(&format!(" {description}"));
        }
        sections.push(activity_section);

        if !request.activity.controls.is_empty() {
            sections.push(format!("Controls: {}", format_controls(&request.activity.controls)));
        }

        sections.join("\n")
    }
}

fn format_controls(controls: &[Control]) -> String {
    controls
        .iter()
        .map(|control| match &control.enforcement {
            Some(enforcement) => format!("{} ({enforcement})", control.name),
            None => control.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl ActorAdapter for AiActor {
    async fn execute(&self, request: ActorRequest<'_>) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FlowmindError::config("no generative model credential configured (GEMINI_API_KEY)"))?;

        let role = request.role;
        let model = role.and_then(|r| r.model.as_deref()).unwrap_or(DEFAULT_MODEL);
        let temperature = role.and_then(|r| r.temperature).unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = role.and_then(|r| r.max_tokens).unwrap_or(DEFAULT_MAX_TOKENS);

        let system_prompt = self.compose_system_prompt(&request);
        let url = format!("{}/{model}:generateContent?key={api_key}", self.endpoint_base);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.inputs.to_string() }] }],
            "generationConfig": { "temperature": temperature, "maxOutputTokens": max_tokens },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FlowmindError::integration(format!("generative model call failed: {e}")))?;

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| FlowmindError::integration(format!("generative model returned invalid JSON: {e}")))?;

        let text = parsed["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(object)) => Ok(Value::Object(object)),
            _ => Ok(json!({ "output": text, "status": "complex_completed" })),
        }
    }
}
