//! OpenAI-compatible chat-completions client

use super::prompts::{follow_up_prompt, SYSTEM_PROMPT};
use super::{validate_question, NarrativeContext, NarrativeGenerator};
use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCompletionsConfig {
    /// Base URL of the API; `chat/completions` is appended
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for ChatCompletionsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            max_tokens: 1024,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// Narrator backed by a remote chat-completions model
pub struct ChatCompletionsNarrator {
    client: Client,
    completions_url: Url,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl ChatCompletionsNarrator {
    pub fn new(config: &ChatCompletionsConfig) -> Result<Self> {
        let mut endpoint = config.endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let completions_url = Url::parse(&endpoint)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| {
                AnalysisError::InvalidConfig(format!("invalid narrative endpoint: {}", e))
            })?;

        if config.model.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "narrative model must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            completions_url,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn completions_url(&self) -> &Url {
        &self.completions_url
    }
}

#[async_trait]
impl NarrativeGenerator for ChatCompletionsNarrator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn answer(&self, context: &NarrativeContext, question: &str) -> Result<String> {
        let question = validate_question(question)?;
        let prompt = follow_up_prompt(question, context);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            stream: false,
        };

        let mut builder = self.client.post(self.completions_url.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        debug!(model = %self.model, url = %self.completions_url, "Requesting narrative answer");
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Narrative(format!(
                "model endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AnalysisError::Narrative("model returned no answer".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComplexityLevel;
    use mockito::Matcher;
    use rust_decimal::Decimal;

    fn context() -> NarrativeContext {
        NarrativeContext {
            application_name: "Claims Portal".to_string(),
            server_count: 2,
            total_cores: 12,
            total_memory_gb: 40,
            complexity: ComplexityLevel::High,
            estimated_timeframe: "3-6 months".to_string(),
            monthly_cost: Decimal::new(71700, 2),
            annual_cost: Decimal::new(860400, 2),
            migration_cost: Decimal::new(1500000, 2),
            region: "West US 2".to_string(),
            risks: Vec::new(),
            prerequisites: Vec::new(),
        }
    }

    fn narrator_for(server: &mockito::Server) -> ChatCompletionsNarrator {
        ChatCompletionsNarrator::new(&ChatCompletionsConfig {
            endpoint: server.url(),
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            timeout_secs: 5,
            max_tokens: 256,
        })
        .unwrap()
    }

    #[test]
    fn test_completions_url_joined() {
        let narrator = ChatCompletionsNarrator::new(&ChatCompletionsConfig::default()).unwrap();
        assert_eq!(
            narrator.completions_url().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let config = ChatCompletionsConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ChatCompletionsNarrator::new(&config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_answer_from_model() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "test-model",
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Plan for three phases."}}]}"#)
            .create_async()
            .await;

        let answer = narrator_for(&server)
            .answer(&context(), "Show me the timeline")
            .await
            .unwrap();

        assert_eq!(answer, "Plan for three phases.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_prompt_includes_question() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex("QUESTION: Is DR covered\\?".to_string()))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"Not yet."}}]}"#)
            .create_async()
            .await;

        let answer = narrator_for(&server)
            .answer(&context(), "Is DR covered?")
            .await
            .unwrap();

        assert_eq!(answer, "Not yet.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_narrative_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = narrator_for(&server)
            .answer(&context(), "Costs?")
            .await
            .unwrap_err();

        match err {
            AnalysisError::Narrative(message) => assert!(message.contains("upstream exploded")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_narrative_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = narrator_for(&server)
            .answer(&context(), "Costs?")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Narrative(_)));
    }
}
