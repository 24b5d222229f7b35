use crate::generator::{Generator, GeneratorError};
use async_trait::async_trait;
use serde_json::Value;

/// Non-streaming client for any OpenAI-compatible chat completions
/// endpoint. The whole instruction + context + user message arrives as
/// one composed prompt, so a single user-role message is enough.
pub struct HttpGenerator {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl HttpGenerator {
    /// `base_url` includes the API prefix (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.7,
        })
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let mut request = self.client.post(self.endpoint()).json(&self.body(prompt));
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| GeneratorError::Unavailable {
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GeneratorError::RateLimited);
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "generator returned error status");
            return Err(GeneratorError::Unavailable {
                message: format!("generator returned {status}"),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| GeneratorError::BadPayload {
                message: err.to_string(),
            })?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| GeneratorError::BadPayload {
                message: "completion carries no message content".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let generator = HttpGenerator::new(
            "http://localhost:8080/v1/".to_string(),
            String::new(),
            "test".to_string(),
        );
        assert_eq!(generator.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn body_carries_prompt_as_single_user_message() {
        let generator = HttpGenerator::new(
            "http://localhost/v1".to_string(),
            "key".to_string(),
            "test-model".to_string(),
        );
        let body = generator.body("hello");
        assert_eq!(body["model"], "test-model");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hello");
    }
}
