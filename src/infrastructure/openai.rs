use crate::domain::ports::Explainer;
use crate::error::ExplainError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Builds the mentor prompt for one question.
pub fn explanation_prompt(question: &str) -> String {
    format!("Explain the logic of this UPSC question: {question}")
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Upper bound for the HTTP round trip.
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Chat-completions client. One request per call, no retries.
#[derive(Clone, Debug)]
pub struct OpenAiExplainer {
    config: OpenAiConfig,
    http: reqwest::Client,
}

impl OpenAiExplainer {
    pub fn new(config: OpenAiConfig) -> Result<Self, ExplainError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplainError::Http(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn messages_body(&self, prompt: String) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        })
    }
}

#[derive(Deserialize)]
struct Choices {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Msg,
}

#[derive(Deserialize)]
struct Msg {
    content: Option<String>,
}

/// Extracts the first choice's text from a completion response body.
pub fn first_choice_text(body: &str) -> Result<String, ExplainError> {
    let parsed: Choices =
        serde_json::from_str(body).map_err(|e| ExplainError::MalformedResponse(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ExplainError::MalformedResponse("no choices".into()))
}

#[async_trait]
impl Explainer for OpenAiExplainer {
    #[instrument(skip(self, question), fields(model = %self.config.model))]
    async fn explain(&self, question: &str) -> Result<String, ExplainError> {
        let body = self.messages_body(explanation_prompt(question));
        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplainError::Timeout(self.config.timeout)
                } else {
                    ExplainError::Http(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ExplainError::Authentication);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ExplainError::RateLimit);
        }
        if !status.is_success() {
            let txt = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExplainError::Api(format!("{status}: {txt}")));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| ExplainError::Http(e.to_string()))?;
        first_choice_text(&text)
    }
}
