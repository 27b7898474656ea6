//! Chat service boundary and the Bedrock adapter behind it.
//!
//! The browser only needs "send context + prompt, get text back". Anything
//! implementing [`ChatService`] can be injected; the TUI and batch mode use
//! [`BedrockChat`], tests use fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ChatConfig;

/// A question about the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub context: String,
    pub prompt: String,
}

impl ChatRequest {
    pub fn new(context: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            prompt: prompt.into(),
        }
    }

    /// The single user turn sent to the model.
    pub fn combined_text(&self) -> String {
        format!("{}\n\n{}", self.context, self.prompt)
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat service unavailable: {0}")]
    Unavailable(String),
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode chat response: {0}")]
    Decode(String),
    #[error("no assistant message found in the response")]
    EmptyReply,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<String, ChatError>;
}

/// Stand-in used when the real adapter could not be built (e.g. no API key).
/// Every request fails with the construction error, which ends up in the chat
/// transcript.
pub struct UnavailableChat {
    reason: String,
}

impl UnavailableChat {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ChatService for UnavailableChat {
    async fn send(&self, _request: ChatRequest) -> Result<String, ChatError> {
        Err(ChatError::Unavailable(self.reason.clone()))
    }
}

// ── Bedrock wire format ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    #[serde(rename = "inferenceConfig")]
    inference_config: InferenceConfig,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct InferenceConfig {
    max_new_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<TextContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextContent {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    output: ResponseOutput,
}

#[derive(Debug, Deserialize)]
struct ResponseOutput {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<TextContent>,
}

/// Amazon Bedrock `InvokeModel` over HTTPS with API-key (bearer) auth.
pub struct BedrockChat {
    client: reqwest::Client,
    invoke_url: String,
    token: String,
    model_id: String,
    max_new_tokens: u32,
}

impl BedrockChat {
    /// Build from an already resolved [`ChatConfig`] (see
    /// [`ChatConfig::resolve`]). Region may be overridden by `AWS_REGION` /
    /// `AWS_DEFAULT_REGION` when no explicit endpoint is configured.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ChatError::Unavailable(format!("environment variable {} is not set", config.token_env))
            })?;

        let base = match &config.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let region = std::env::var("AWS_REGION")
                    .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                    .unwrap_or_else(|_| config.region.clone());
                format!("https://bedrock-runtime.{}.amazonaws.com", region)
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            invoke_url: format!("{}/model/{}/invoke", base, config.model_id),
            token,
            model_id: config.model_id.clone(),
            max_new_tokens: config.max_new_tokens,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn body(&self, request: &ChatRequest) -> InvokeRequest<'static> {
        InvokeRequest {
            inference_config: InferenceConfig {
                max_new_tokens: self.max_new_tokens,
            },
            messages: vec![Message {
                role: "user",
                content: vec![TextContent {
                    text: request.combined_text(),
                }],
            }],
        }
    }
}

#[async_trait]
impl ChatService for BedrockChat {
    async fn send(&self, request: ChatRequest) -> Result<String, ChatError> {
        debug!(
            "invoking {} ({} context bytes)",
            self.model_id,
            request.context.len()
        );
        let response = self
            .client
            .post(&self.invoke_url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&self.body(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let parsed: InvokeResponse =
            serde_json::from_slice(&bytes).map_err(|e| ChatError::Decode(e.to_string()))?;
        parsed
            .output
            .message
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(ChatError::EmptyReply)
    }
}
