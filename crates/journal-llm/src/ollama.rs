//! Ollama analyzer: one generate call per entry, JSON-constrained output.

use journal_types::{AnalysisResult, Analyzer, AnalyzerError};
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the inference endpoint.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Full URL of the generate endpoint.
    pub url: String,
    pub model: String,
    /// Upper bound on one analysis call; the call fails rather than hangs.
    pub timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434/api/generate".to_string(),
            model: "llama3.2:3b".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Envelope returned by the generate endpoint. The model's own output is the
/// text under `response`, which must itself parse as the result shape.
#[derive(Debug, Deserialize)]
struct GenerateEnvelope {
    response: Option<String>,
}

/// Analyzer that calls an Ollama-compatible generate endpoint. The JSON
/// format constraint travels as a request parameter, not as prompt text.
pub struct OllamaAnalyzer {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

impl OllamaAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        let mut config = AnalyzerConfig::default();
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.url = url;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            config.model = model;
        }
        Self::new(config)
    }

    fn build_prompt(entry: &str, memory: &str) -> String {
        format!(
            r#"Analyze this journal entry: {entry}
Past context: {memory}
Return a single JSON object with:
{{
"sentiment": "positive/negative/neutral",
"summary": "short summary",
"suggestions": ["suggestion1", "suggestion2"],
"themes": ["theme1", "theme2"],
"goals": ["goal1"]
}}
"#
        )
    }
}

#[async_trait::async_trait]
impl Analyzer for OllamaAnalyzer {
    async fn analyze(&self, entry: &str, memory: &str) -> Result<AnalysisResult, AnalyzerError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": Self::build_prompt(entry, memory),
            "stream": false,
            "format": "json",
        });
        let res = self
            .client
            .post(&self.config.url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzerError::EndpointUnreachable(e.to_string()))?;
        let status = res.status();
        let raw = res
            .text()
            .await
            .map_err(|e| AnalyzerError::EndpointUnreachable(e.to_string()))?;
        if !status.is_success() {
            return Err(AnalyzerError::EndpointError {
                status: status.as_u16(),
                body: raw,
            });
        }
        parse_envelope(&raw)
    }
}

/// Parse the endpoint envelope, then the model output inside it. The raw
/// envelope is logged on failure so malformed output can be diagnosed.
fn parse_envelope(raw: &str) -> Result<AnalysisResult, AnalyzerError> {
    let envelope: GenerateEnvelope = serde_json::from_str(raw).map_err(|e| {
        tracing::error!(envelope = raw, "generate envelope is not valid JSON");
        AnalyzerError::MalformedResponse(e.to_string())
    })?;
    let output = envelope.response.ok_or_else(|| {
        tracing::error!(envelope = raw, "generate envelope missing response field");
        AnalyzerError::MalformedResponse("missing response field".to_string())
    })?;
    serde_json::from_str(&output).map_err(|e| {
        tracing::error!(envelope = raw, "model output is not the expected JSON shape");
        AnalyzerError::MalformedResponse(e.to_string())
    })
}
