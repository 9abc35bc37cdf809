//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};
use super::test_bot_token;

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server with the default endpoints mounted
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let mock = Self { server };
        mock.mock_send_message().await;
        mock.mock_answer_callback_query().await;
        mock
    }

    /// Create a bot pointed at this server
    pub fn create_bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server uri is a valid url");
        Bot::new(test_bot_token()).set_api_url(url)
    }

    fn method_path(name: &str) -> String {
        // Method names are case-insensitive for the Bot API
        format!(r"(?i)^/bot{}/{}$", test_bot_token(), name)
    }

    /// Setup mock for sendMessage endpoint
    pub async fn mock_send_message(&self) {
        let response_body = json!({
            "ok": true,
            "result": {
                "message_id": 123,
                "from": {
                    "id": 12345,
                    "is_bot": true,
                    "first_name": "VocabBot",
                    "username": "vocab_bot"
                },
                "chat": {
                    "id": 987654321,
                    "first_name": "Test",
                    "type": "private"
                },
                "date": 1640995200,
                "text": "Test message"
            }
        });

        Mock::given(method("POST"))
            .and(path_regex(Self::method_path("sendmessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for answerCallbackQuery endpoint
    pub async fn mock_answer_callback_query(&self) {
        Mock::given(method("POST"))
            .and(path_regex(Self::method_path("answercallbackquery")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every sendMessage request received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
