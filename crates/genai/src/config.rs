/// Default model used when `GENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Generative Language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Generative-model client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-2.0-flash`.
    pub model: String,
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds (default: `60`).
    pub timeout_secs: u64,
}

impl GenAiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                       |
    /// |----------------------|-----------------------------------------------|
    /// | `GENAI_API_KEY`      | falls back to `GEMINI_API_KEY`, `GOOGLE_API_KEY` |
    /// | `GENAI_MODEL`        | `gemini-2.0-flash`                            |
    /// | `GENAI_BASE_URL`     | `https://generativelanguage.googleapis.com`   |
    /// | `GENAI_TIMEOUT_SECS` | `60`                                          |
    pub fn from_env() -> Self {
        let api_key = ["GENAI_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .expect("GENAI_API_KEY (or GEMINI_API_KEY / GOOGLE_API_KEY) must be set");

        let model = std::env::var("GENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("GENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("GENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("GENAI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }
}
