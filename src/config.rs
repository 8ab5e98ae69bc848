use std::{env, time::Duration};

use clap::Args;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Vendor configuration flags, each with an environment fallback.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// OpenAI api key
    #[arg(long, env = OPENAI_API_KEY, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI chat completion model
    #[arg(long, default_value = DEFAULT_OPENAI_MODEL, env = "OPENAI_MODEL")]
    pub openai_model: String,

    /// OpenAI api base url
    #[arg(long, default_value = DEFAULT_OPENAI_BASE_URL, env = "OPENAI_BASE_URL")]
    pub openai_base_url: String,

    /// Gemini api key
    #[arg(long, env = GEMINI_API_KEY, hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini generative model
    #[arg(long, default_value = DEFAULT_GEMINI_MODEL, env = "GEMINI_MODEL")]
    pub gemini_model: String,

    /// Gemini api base url
    #[arg(long, default_value = DEFAULT_GEMINI_BASE_URL, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: String,

    /// Per-request timeout for vendor api calls (no timeout when unset)
    #[arg(long, env = "SUMMARIZER_TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl VendorConfig {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            // An empty key is as good as no key
            api_key: api_key.filter(|key| !key.is_empty()),
            model,
            base_url,
        }
    }
}

/// Process-wide configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub openai: VendorConfig,
    pub gemini: VendorConfig,
    pub timeout_seconds: Option<u64>,
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Read the same settings [`ConfigArgs`] accepts straight from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |key: &str| env::var(key).ok();
        let timeout_seconds = match var("SUMMARIZER_TIMEOUT_SECONDS") {
            Some(value) => Some(value.parse::<u64>().map_err(|e| {
                anyhow::anyhow!("SUMMARIZER_TIMEOUT_SECONDS is not a number: {}", e)
            })?),
            None => None,
        };

        Ok(Self {
            openai: VendorConfig::new(
                var(OPENAI_API_KEY),
                var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ),
            gemini: VendorConfig::new(
                var(GEMINI_API_KEY),
                var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            ),
            timeout_seconds,
        })
    }
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        Self {
            openai: VendorConfig::new(
                args.openai_api_key,
                args.openai_model,
                args.openai_base_url,
            ),
            gemini: VendorConfig::new(
                args.gemini_api_key,
                args.gemini_model,
                args.gemini_base_url,
            ),
            timeout_seconds: args.timeout_seconds,
        }
    }
}
