//! Language-model assistant collaborator.
//!
//! The assistant is optional everywhere it is used: query synthesis falls
//! back to a deterministic rule engine and enrichment becomes a no-op when
//! none is configured. Components therefore take an
//! `Option<Arc<dyn Assistant>>` resolved once at process start.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::HttpClient;

/// Errors from an assistant call
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssistantError {
    /// Network or HTTP error
    #[error("Assistant request failed: {0}")]
    Http(String),

    /// Non-success status from the assistant service
    #[error("Assistant service error: {0}")]
    Api(String),

    /// Response body did not have the expected shape
    #[error("Malformed assistant response: {0}")]
    Malformed(String),
}

/// A fallible free-text completion service.
///
/// One method, so live and mock implementations stay interchangeable; the
/// rest of the pipeline is written against this trait only.
#[async_trait]
pub trait Assistant: Send + Sync + std::fmt::Debug {
    /// Complete a prompt, returning the assistant's raw text reply
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AssistantError>;
}

/// Assistant backed by an Ollama chat endpoint
#[derive(Debug, Clone)]
pub struct OllamaAssistant {
    client: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaAssistant {
    /// Create an assistant against an Ollama server
    pub fn new(
        client: HttpClient,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            timeout,
        }
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait]
impl Assistant for OllamaAssistant {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
            options: ChatOptions {
                num_predict: max_tokens,
                temperature,
            },
        };

        let response = self
            .client
            .post(&self.chat_endpoint())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Api(format!("chat HTTP {}", status)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Malformed(e.to_string()))?;

        Ok(parsed.message.content)
    }
}

pub mod mock {
    //! Scripted assistant for testing purposes.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// An assistant that pops one predefined reply per call.
    ///
    /// When the script runs out it returns an [`AssistantError::Api`] so
    /// tests fail loudly instead of hanging on a real endpoint.
    #[derive(Debug, Default)]
    pub struct MockAssistant {
        replies: Mutex<VecDeque<Result<String, AssistantError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockAssistant {
        /// Create a mock with no scripted replies
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock that replies in order from the given script
        pub fn with_replies(replies: Vec<Result<String, AssistantError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// User prompts seen so far, in call order
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Assistant for MockAssistant {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, AssistantError> {
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AssistantError::Api("mock script exhausted".to_string())))
        }
    }
}
