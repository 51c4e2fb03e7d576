use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const MODEL_NAME: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// External generative model collaborator. Injected into the gateway so tests
/// can substitute a stub.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: ModelPrompt) -> Result<String>;
}

pub struct GeminiService {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiService {
    pub fn new() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;

        Self::with_api_base(api_key, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(api_key: String, api_base: String) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            api_base,
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiService {
    async fn generate(&self, prompt: ModelPrompt) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: prompt.document.mime_type,
                            data: prompt.document.data,
                        },
                    },
                    GeminiPart::Text { text: prompt.text },
                ],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: 0.3,
                max_output_tokens: 1000,
            }),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, MODEL_NAME, self.api_key
        );

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!("Gemini API error: {}", error_text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| match p {
                GeminiPart::Text { text } => Some(text.clone()),
                GeminiPart::InlineData { .. } => None,
            })
            .ok_or_else(|| anyhow::anyhow!("Gemini response contained no text candidate"))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_uri::{DataUri, PDF_MIME_TYPE};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_prompt() -> ModelPrompt {
        ModelPrompt {
            text: "What is the title?".to_string(),
            document: DataUri::encode(PDF_MIME_TYPE, b"%PDF-1.4 sample"),
        }
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let server = MockServer::start().await;
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Annual Report 2023"}]}}
            ]
        });
        Mock::given(method("POST"))
            .and(path(format!("/models/{}:generateContent", MODEL_NAME)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let service = GeminiService::with_api_base("test-key".to_string(), server.uri()).unwrap();
        let text = service.generate(sample_prompt()).await.unwrap();
        assert_eq!(text, "Annual Report 2023");
    }

    #[tokio::test]
    async fn surfaces_api_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let service = GeminiService::with_api_base("test-key".to_string(), server.uri()).unwrap();
        let err = service.generate(sample_prompt()).await.unwrap_err();
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn errors_on_malformed_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let service = GeminiService::with_api_base("test-key".to_string(), server.uri()).unwrap();
        assert!(service.generate(sample_prompt()).await.is_err());
    }

    #[tokio::test]
    async fn errors_when_no_candidates_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let service = GeminiService::with_api_base("test-key".to_string(), server.uri()).unwrap();
        let err = service.generate(sample_prompt()).await.unwrap_err();
        assert!(err.to_string().contains("no text candidate"));
    }
}
