use crate::errors::ServiceError;
use crate::models::Mood;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_context: &str, user_text: &str)
    -> Result<String, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(
        &self,
        system_context: &str,
        user_text: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_context},
                    {"role": "user", "content": user_text}
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion_content(&body)
    }
}

#[derive(Deserialize)]
struct CompletionBody {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

fn parse_completion_content(body: &str) -> Result<String, ServiceError> {
    let parsed: CompletionBody =
        serde_json::from_str(body).map_err(|err| ServiceError::Malformed(err.to_string()))?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ServiceError::Malformed("response has no message content".to_string()))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Malformed("message content is empty".to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn system_context(mood: Mood, focus: &str) -> String {
    format!(
        "You are VERA, a warm and supportive daily check-in companion. \
         The user is feeling {} today and wants to focus on: {}. \
         Reply in two or three sentences, acknowledging how they feel and \
         gently steering them back to their focus.",
        mood.as_str(),
        focus
    )
}

/// Single attempt bounded by `limit`; an elapsed timer becomes `ServiceError::Timeout`.
pub async fn generate_with_timeout(
    generator: &dyn TextGenerator,
    limit: Duration,
    system_context: &str,
    user_text: &str,
) -> Result<String, ServiceError> {
    tokio::time::timeout(limit, generator.generate(system_context, user_text))
        .await
        .map_err(|_| ServiceError::Timeout(limit))?
}
