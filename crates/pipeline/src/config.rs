/// Connection settings for the chat-completions endpoint.
#[derive(Clone)]
pub struct LlmConfig {
    /// Base URL without the `/v1/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Pipeline configuration, built once at startup and handed to
/// [`CrewPipeline::new`](crate::CrewPipeline::new).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub llm: LlmConfig,
    /// Maximum LLM calls per minute across all runs of one pipeline.
    /// `0` disables the limit.
    pub max_rpm: u32,
    /// Document text beyond this many characters is not sent to the model.
    pub max_document_chars: usize,
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                       |
    /// |----------------------|-------------------------------|
    /// | `LLM_API_KEY`        | `GROQ_API_KEY`, else empty    |
    /// | `LLM_BASE_URL`       | `https://api.groq.com/openai` |
    /// | `LLM_MODEL`          | `llama-3.1-8b-instant`        |
    /// | `LLM_TIMEOUT_SECS`   | `120`                         |
    /// | `LLM_MAX_RPM`        | `5`                           |
    /// | `MAX_DOCUMENT_CHARS` | `12000`                       |
    pub fn from_env() -> Self {
        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("GROQ_API_KEY"))
            .unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("No LLM_API_KEY or GROQ_API_KEY set; LLM calls will be rejected");
        }

        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai".into());

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".into());

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        let max_rpm: u32 = std::env::var("LLM_MAX_RPM")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("LLM_MAX_RPM must be a valid u32");

        let max_document_chars: usize = std::env::var("MAX_DOCUMENT_CHARS")
            .unwrap_or_else(|_| "12000".into())
            .parse()
            .expect("MAX_DOCUMENT_CHARS must be a valid usize");

        Self {
            llm: LlmConfig {
                base_url,
                api_key,
                model,
                timeout_secs,
            },
            max_rpm,
            max_document_chars,
        }
    }
}
