use crate::error::{FpaError, Result};
use crate::llm::types::*;
use log::debug;
use reqwest::Client;

/// HTTP client for the hosted language model.
///
/// Built explicitly by the caller and handed to whatever needs it; there is no
/// process-wide instance.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: AssistantConfig,
}

impl ChatClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Sends the conversation and returns the text of the first choice.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
        };

        debug!(
            "Sending {} messages to model {}",
            messages.len(),
            self.config.model
        );

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(FpaError::AssistantFailed(format!(
                "Completion API error (status {}): {}",
                status, err_text
            )));
        }

        let body: ChatCompletionResponse = res.json().await?;

        let text = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FpaError::AssistantFailed("No choices returned".to_string()))?
            .message
            .content;

        if text.trim().is_empty() {
            return Err(FpaError::AssistantFailed(
                "Model returned an empty reply".to_string(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(AssistantConfig::new("test-model", "secret").with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Revenue is 10% over plan."}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let reply = client_for(&mock_server)
            .complete(&[ChatMessage::user("How is revenue?")])
            .await
            .unwrap();
        assert_eq!(reply, "Revenue is 10% over plan.");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        match err {
            FpaError::AssistantFailed(msg) => assert!(msg.contains("rate limited")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_fail() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server)
            .complete(&[ChatMessage::user("hi")])
            .await;
        assert!(matches!(result, Err(FpaError::AssistantFailed(_))));
    }
}
