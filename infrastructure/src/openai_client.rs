use crate::http::{completion_status_error, completion_transport_error, http_client};
use async_trait::async_trait;
use domain::{CompletionEndpointError, CompletionProvider, CompletionReply, CompletionRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Arc::new(http_client(timeout)?),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Shares the HTTP client with other adapters talking to the same host.
    pub fn http(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

fn build_body(request: &CompletionRequest) -> ChatRequest {
    ChatRequest {
        model: request.model.as_str().to_string(),
        messages: request
            .messages()
            .into_iter()
            .map(|m| Message {
                role: m.role.as_str().to_string(),
                content: m.content,
            })
            .collect(),
        temperature: request.sampling.temperature(),
        top_p: request.sampling.top_p(),
    }
}

fn parse_reply(body: &str) -> std::result::Result<CompletionReply, CompletionEndpointError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionEndpointError::MalformedResponse(e.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            CompletionEndpointError::MalformedResponse("no choices in response".into())
        })?;
    Ok(CompletionReply::new(content.trim()))
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<CompletionReply, CompletionEndpointError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_body(request);
        debug!(model = %body.model, messages = body.messages.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(completion_transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(completion_transport_error)?;
        if !status.is_success() {
            return Err(completion_status_error(status.as_u16(), text));
        }
        parse_reply(&text)
    }
}
