//! HTTP client for the OpenAI and Anthropic message APIs.
//!
//! One client routes by the selected model's provider: OpenAI-compatible
//! chat completions or Anthropic messages, each with a non-streaming send
//! and an SSE stream. The TUI never calls these directly on its own
//! context; requests run in a background task that forwards `LlmEvent`s
//! into the UI event queue.

use std::pin::Pin;

use anyhow::Result;
use futures_util::Stream;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::Config;
use crate::logging;
use crate::models::{ModelConfig, Provider, model_config};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS_CAP: u32 = 4_096;

/// Typed failures surfaced to the user as notices. None of these may
/// corrupt pane or layout state.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No model selected. Pick one in the Model Selection pane first.")]
    NoModelSelected,
    #[error("Unknown model '{0}'")]
    UnknownModel(String),
    #[error("{0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Prompt payload assembled from the panes at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    /// Full `provider:model` identifier.
    pub model: String,
    pub user_prompt: String,
    pub system_prompt: String,
    pub context: String,
}

impl SendRequest {
    /// Context is prepended to the user prompt rather than sent as a
    /// separate message.
    #[must_use]
    fn full_prompt(&self) -> String {
        if self.context.trim().is_empty() {
            self.user_prompt.clone()
        } else {
            format!("Context:\n{}\n\n{}", self.context, self.user_prompt)
        }
    }
}

/// Events the background request task feeds back into the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmEvent {
    Chunk(String),
    Completed { response: String },
    Failed { message: String },
}

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Provider-routed LLM client.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http_client: reqwest::Client,
    config: Config,
}

impl LlmClient {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    fn resolve(&self, model: &str) -> Result<(&'static ModelConfig, String, String), LlmError> {
        if model.trim().is_empty() {
            return Err(LlmError::NoModelSelected);
        }
        let config =
            model_config(model).ok_or_else(|| LlmError::UnknownModel(model.to_string()))?;
        let api_key = self
            .config
            .api_key(config.provider)
            .map_err(|err| LlmError::MissingApiKey(err.to_string()))?;
        let base_url = self.config.base_url(config.provider);
        Ok((config, api_key, base_url))
    }

    fn headers(provider: Provider, api_key: &str) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match provider {
            Provider::OpenAi => {
                let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .map_err(|_| LlmError::MissingApiKey("API key is not valid ASCII".into()))?;
                headers.insert(AUTHORIZATION, value);
            }
            Provider::Anthropic => {
                let value = HeaderValue::from_str(api_key)
                    .map_err(|_| LlmError::MissingApiKey("API key is not valid ASCII".into()))?;
                headers.insert("x-api-key", value);
                headers.insert(
                    "anthropic-version",
                    HeaderValue::from_static(ANTHROPIC_VERSION),
                );
            }
        }
        Ok(headers)
    }

    fn build_body(model: &ModelConfig, request: &SendRequest, stream: bool) -> Value {
        let max_tokens = model.max_output_tokens.min(MAX_OUTPUT_TOKENS_CAP);
        match model.provider {
            Provider::OpenAi => {
                let mut messages = Vec::new();
                if !request.system_prompt.trim().is_empty() {
                    messages.push(json!({"role": "system", "content": request.system_prompt}));
                }
                messages.push(json!({"role": "user", "content": request.full_prompt()}));
                let mut body = json!({
                    "model": model.api_name(),
                    "messages": messages,
                    "max_tokens": max_tokens,
                });
                if stream {
                    body["stream"] = json!(true);
                }
                body
            }
            Provider::Anthropic => {
                let mut body = json!({
                    "model": model.api_name(),
                    "max_tokens": max_tokens,
                    "messages": [{"role": "user", "content": request.full_prompt()}],
                });
                if !request.system_prompt.trim().is_empty() {
                    body["system"] = json!(request.system_prompt);
                }
                if stream {
                    body["stream"] = json!(true);
                }
                body
            }
        }
    }

    fn endpoint(provider: Provider, base_url: &str) -> String {
        match provider {
            Provider::OpenAi => format!("{base_url}/chat/completions"),
            Provider::Anthropic => format!("{base_url}/v1/messages"),
        }
    }

    async fn post(
        &self,
        model: &ModelConfig,
        request: &SendRequest,
        stream: bool,
    ) -> Result<reqwest::Response, LlmError> {
        let (_, api_key, base_url) = self.resolve(&request.model)?;
        let url = Self::endpoint(model.provider, &base_url);
        let headers = Self::headers(model.provider, &api_key)?;
        let body = Self::build_body(model, request, stream);

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|err| LlmError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            logging::warn(format!("{} request failed: HTTP {status}", model.provider));
            return Err(LlmError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Send and wait for the complete response text.
    pub async fn send(&self, request: &SendRequest) -> Result<String, LlmError> {
        let (model, _, _) = self.resolve(&request.model)?;
        let response = self.post(model, request, false).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        extract_response_text(model.provider, &payload)
    }

    /// Send with streaming enabled, yielding text chunks as they arrive.
    pub async fn stream(&self, request: &SendRequest) -> Result<ChunkStream, LlmError> {
        let (model, _, _) = self.resolve(&request.model)?;
        let provider = model.provider;
        let response = self.post(model, request, true).await?;
        let byte_stream = response.bytes_stream();

        let stream = async_stream::stream! {
            use futures_util::StreamExt;

            let mut byte_buf: Vec<u8> = Vec::new();
            let mut byte_stream = std::pin::pin!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        yield Err(LlmError::Network(format!("Stream read error: {err}")));
                        break;
                    }
                };
                byte_buf.extend_from_slice(&chunk);

                // Process complete SSE lines from the buffer.
                loop {
                    let buf_str = String::from_utf8_lossy(&byte_buf);
                    let Some(newline_pos) = buf_str.find('\n') else { break };
                    let line: String = buf_str[..newline_pos].trim_end_matches('\r').to_string();
                    let consumed = newline_pos + 1;
                    byte_buf = byte_buf[consumed..].to_vec();

                    let Some(data) = line.strip_prefix("data: ") else {
                        // Ignore blank separators and other SSE fields
                        // (event:, id:, retry:).
                        continue;
                    };
                    if data.trim() == "[DONE]" {
                        continue;
                    }
                    if let Ok(payload) = serde_json::from_str::<Value>(data)
                        && let Some(text) = extract_stream_chunk(provider, &payload)
                        && !text.is_empty()
                    {
                        yield Ok(text);
                    }
                }
            }
        };

        Ok(Pin::from(
            Box::new(stream) as Box<dyn Stream<Item = Result<String, LlmError>> + Send>
        ))
    }
}

fn extract_response_text(provider: Provider, payload: &Value) -> Result<String, LlmError> {
    let text = match provider {
        Provider::OpenAi => payload["choices"][0]["message"]["content"].as_str(),
        Provider::Anthropic => payload["content"][0]["text"].as_str(),
    };
    text.map(ToString::to_string)
        .ok_or_else(|| LlmError::InvalidResponse("response carried no text content".to_string()))
}

fn extract_stream_chunk(provider: Provider, payload: &Value) -> Option<String> {
    match provider {
        Provider::OpenAi => payload["choices"][0]["delta"]["content"]
            .as_str()
            .map(ToString::to_string),
        Provider::Anthropic => {
            if payload["type"].as_str() == Some("content_block_delta") {
                payload["delta"]["text"].as_str().map(ToString::to_string)
            } else {
                None
            }
        }
    }
}

/// Run a request on a background task, forwarding progress into the UI
/// event queue. The task never touches pane or layout state.
pub fn spawn_request(
    client: LlmClient,
    request: SendRequest,
    streaming: bool,
    tx: UnboundedSender<LlmEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if streaming {
            let mut full_response = String::new();
            let stream = match client.stream(&request).await {
                Ok(stream) => stream,
                Err(err) => {
                    logging::error(format!("stream request failed: {err}"));
                    let _ = tx.send(LlmEvent::Failed {
                        message: err.to_string(),
                    });
                    return;
                }
            };
            use futures_util::StreamExt;
            let mut stream = stream;
            while let Some(item) = stream.next().await {
                match item {
                    Ok(chunk) => {
                        full_response.push_str(&chunk);
                        if tx.send(LlmEvent::Chunk(chunk)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(LlmEvent::Failed {
                            message: err.to_string(),
                        });
                        return;
                    }
                }
            }
            let _ = tx.send(LlmEvent::Completed {
                response: full_response,
            });
        } else {
            match client.send(&request).await {
                Ok(response) => {
                    let _ = tx.send(LlmEvent::Completed { response });
                }
                Err(err) => {
                    logging::error(format!("send request failed: {err}"));
                    let _ = tx.send(LlmEvent::Failed {
                        message: err.to_string(),
                    });
                }
            }
        }
    })
}
