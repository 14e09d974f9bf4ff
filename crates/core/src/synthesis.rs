use crate::error::SynthesisError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Capability interface for the language model turning a prompt into an
/// answer. The response text is returned unmodified; there is no retry and
/// no validation of the model's output.
#[async_trait]
pub trait AnswerSynthesizer {
    fn model_id(&self) -> &str;
    async fn synthesize(&self, prompt: &str) -> Result<String, SynthesisError>;
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Answer synthesizer backed by an Ollama server.
pub struct OllamaGenerator {
    endpoint: String,
    model: String,
    client: Client,
}

impl OllamaGenerator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl AnswerSynthesizer for OllamaGenerator {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn synthesize(&self, prompt: &str) -> Result<String, SynthesisError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|error| SynthesisError(error.to_string()))?;

        if !response.status().is_success() {
            return Err(SynthesisError(format!(
                "generation endpoint returned {}",
                response.status()
            )));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|error| SynthesisError(error.to_string()))?;

        Ok(payload.response)
    }
}
