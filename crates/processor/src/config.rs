use passport_core::DateConvention;

/// Processor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Base URL of the passport API, without trailing slash.
    pub api_url: String,
    /// Date convention to validate with. When unset, the server's
    /// `/api/v1/passport/config` is asked.
    pub date_convention: Option<DateConvention>,
    /// Per-request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
}

impl ProcessorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                   |
    /// |-----------------------------|---------------------------|
    /// | `PASSPORT_API_URL`          | `http://localhost:3000`   |
    /// | `DATE_FORMAT`               | ask the server            |
    /// | `PASSPORT_API_TIMEOUT_SECS` | `120`                     |
    pub fn from_env() -> Self {
        let api_url = std::env::var("PASSPORT_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let date_convention = std::env::var("DATE_FORMAT").ok().map(|v| {
            v.parse()
                .unwrap_or_else(|e| panic!("DATE_FORMAT is invalid: {e}"))
        });

        let request_timeout_secs: u64 = std::env::var("PASSPORT_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("PASSPORT_API_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            date_convention,
            request_timeout_secs,
        }
    }
}
