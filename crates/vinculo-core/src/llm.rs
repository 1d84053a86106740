use crate::config::{resolve_api_key, LlmConfig};
use crate::error::{Result, VinculoError};

/// Text generation against a hosted or local model.
pub struct LlmService {
    provider: LlmProvider,
    config: LlmConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for LlmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmService")
            .field("provider", &self.provider)
            .field("model", &self.config.model)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LlmProvider {
    Ollama,
    OpenAI,
    Gemini,
    Anthropic,
}

impl LlmProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
        }
    }
}

impl LlmService {
    /// Create an LLM service from configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = match config.provider.as_str() {
            "ollama" => LlmProvider::Ollama,
            "openai" => LlmProvider::OpenAI,
            "gemini" => LlmProvider::Gemini,
            "anthropic" | "claude" => LlmProvider::Anthropic,
            other => {
                return Err(VinculoError::Config(format!(
                    "unknown LLM provider: '{other}' (expected 'ollama', 'openai', 'gemini', or 'anthropic')"
                )));
            }
        };

        match provider {
            LlmProvider::OpenAI => {
                resolve_api_key(config, "OPENAI_API_KEY")?;
            }
            LlmProvider::Gemini => {
                resolve_api_key(config, "GEMINI_API_KEY")?;
            }
            LlmProvider::Anthropic => {
                resolve_api_key(config, "ANTHROPIC_API_KEY")?;
            }
            LlmProvider::Ollama => {}
        }

        Ok(Self {
            provider,
            config: config.clone(),
            client: reqwest::Client::new(),
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate text from a prompt with an optional system message.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        tracing::debug!(
            provider = self.provider.name(),
            model = %self.config.model,
            prompt_len = prompt.len(),
            "llm generate"
        );
        match self.provider {
            LlmProvider::Ollama => self.generate_ollama(prompt, system).await,
            LlmProvider::OpenAI => self.generate_openai(prompt, system).await,
            LlmProvider::Gemini => self.generate_gemini(prompt, system).await,
            LlmProvider::Anthropic => self.generate_anthropic(prompt, system).await,
        }
    }

    fn base_url<'a>(&'a self, default: &'a str) -> &'a str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
    }

    /// POST the body and return the decoded JSON reply, mapping transport and
    /// non-2xx failures to `Llm` errors tagged with the provider label.
    async fn post_json(
        &self,
        label: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value> {
        let resp = request
            .send()
            .await
            .map_err(|e| VinculoError::Llm(format!("{label} LLM request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(VinculoError::Llm(format!(
                "{label} LLM error {status}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| VinculoError::Llm(format!("{label} LLM response parse error: {e}")))
    }

    /// Ollama: POST {base_url}/api/generate
    async fn generate_ollama(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url("http://localhost:11434"));

        let mut body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "num_predict": self.config.max_tokens,
            }
        });

        if let Some(sys) = system {
            body["system"] = serde_json::Value::String(sys.to_string());
        }

        let json = self
            .post_json("Ollama", self.client.post(&url).json(&body))
            .await?;

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| VinculoError::Llm("Ollama LLM response missing 'response' field".into()))
    }

    /// OpenAI: POST {base_url}/v1/chat/completions
    async fn generate_openai(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let api_key = resolve_api_key(&self.config, "OPENAI_API_KEY")?;
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url("https://api.openai.com")
        );

        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(serde_json::json!({"role": "system", "content": sys}));
        }
        messages.push(serde_json::json!({"role": "user", "content": prompt}));

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
        });

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body);
        let json = self.post_json("OpenAI", request).await?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| VinculoError::Llm("OpenAI LLM response missing content".into()))
    }

    /// Anthropic: POST {base_url}/v1/messages
    async fn generate_anthropic(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let api_key = resolve_api_key(&self.config, "ANTHROPIC_API_KEY")?;
        let url = format!("{}/v1/messages", self.base_url("https://api.anthropic.com"));

        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        if let Some(sys) = system {
            body["system"] = serde_json::Value::String(sys.to_string());
        }

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body);
        let json = self.post_json("Anthropic", request).await?;

        // {"content": [{"type": "text", "text": "..."}]}
        json["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| VinculoError::Llm("Anthropic LLM response missing text content".into()))
    }

    /// Gemini: POST {base_url}/v1beta/models/{model}:generateContent
    async fn generate_gemini(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let api_key = resolve_api_key(&self.config, "GEMINI_API_KEY")?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url("https://generativelanguage.googleapis.com"),
            self.config.model,
        );

        let mut body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json",
            }
        });

        if let Some(sys) = system {
            body["systemInstruction"] = serde_json::json!({"parts": [{"text": sys}]});
        }

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .json(&body);
        let json = self.post_json("Gemini", request).await?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| VinculoError::Llm("Gemini LLM response missing text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_ollama() {
        let config = LlmConfig {
            enabled: true,
            provider: "ollama".into(),
            model: "llama3.2".into(),
            ..Default::default()
        };
        let service = LlmService::from_config(&config).unwrap();
        assert_eq!(service.provider_name(), "ollama");
        assert_eq!(service.model(), "llama3.2");
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = LlmConfig {
            provider: "banana".into(),
            ..Default::default()
        };
        let result = LlmService::from_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown LLM provider"));
    }

    #[test]
    fn test_from_config_openai_without_key_errors() {
        let config = LlmConfig {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            env_var: Some("VINCULO_TEST_NO_OPENAI_KEY".into()),
            ..Default::default()
        };
        let result = LlmService::from_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_from_config_gemini_with_key() {
        let config = LlmConfig {
            provider: "gemini".into(),
            api_key: Some("g-test".into()),
            ..Default::default()
        };
        let service = LlmService::from_config(&config).unwrap();
        assert_eq!(service.provider_name(), "gemini");
    }

    #[test]
    fn test_from_config_claude_alias() {
        let config = LlmConfig {
            provider: "claude".into(),
            model: "claude-sonnet-4-5-20250929".into(),
            api_key: Some("sk-ant-test".into()),
            ..Default::default()
        };
        let service = LlmService::from_config(&config).unwrap();
        assert_eq!(service.provider_name(), "anthropic");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = LlmConfig {
            provider: "ollama".into(),
            base_url: Some("http://127.0.0.1:11434/".into()),
            ..Default::default()
        };
        let service = LlmService::from_config(&config).unwrap();
        assert_eq!(service.base_url("unused"), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = LlmConfig {
            provider: "openai".into(),
            api_key: Some("sk-secret".into()),
            ..Default::default()
        };
        let service = LlmService::from_config(&config).unwrap();
        let debug = format!("{service:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("OpenAI"));
    }
}
