mod support;

use notesum::{
    Config,
    config::{
        DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_BASE_URL,
        DEFAULT_OPENAI_MODEL, GEMINI_API_KEY, OPENAI_API_KEY,
    },
};
use support::{EnvVarGuard, acquire_test_lock};

const TIMEOUT: &str = "SUMMARIZER_TIMEOUT_SECONDS";

fn clear_env() -> Vec<EnvVarGuard> {
    [
        OPENAI_API_KEY,
        "OPENAI_MODEL",
        "OPENAI_BASE_URL",
        GEMINI_API_KEY,
        "GEMINI_MODEL",
        "GEMINI_BASE_URL",
        TIMEOUT,
    ]
    .into_iter()
    .map(EnvVarGuard::unset)
    .collect()
}

#[tokio::test]
async fn from_env_uses_defaults_when_unset() -> anyhow::Result<()> {
    let _guard = acquire_test_lock().await;
    let _env = clear_env();

    let config = Config::from_env()?;
    assert_eq!(config.openai.api_key, None);
    assert_eq!(config.openai.model, DEFAULT_OPENAI_MODEL);
    assert_eq!(config.openai.base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(config.gemini.api_key, None);
    assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
    assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
    assert_eq!(config.timeout(), None);
    Ok(())
}

#[tokio::test]
async fn from_env_reads_vendor_settings() -> anyhow::Result<()> {
    let _guard = acquire_test_lock().await;
    let _env = clear_env();
    let _openai_key = EnvVarGuard::set(OPENAI_API_KEY, "sk-env");
    let _gemini_key = EnvVarGuard::set(GEMINI_API_KEY, "gm-env");
    let _gemini_model = EnvVarGuard::set("GEMINI_MODEL", "gemini-2.0-pro");
    let _openai_url = EnvVarGuard::set("OPENAI_BASE_URL", "http://127.0.0.1:9/v1");
    let _timeout = EnvVarGuard::set(TIMEOUT, "12");

    let config = Config::from_env()?;
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-env"));
    assert_eq!(config.openai.base_url, "http://127.0.0.1:9/v1");
    assert_eq!(config.gemini.api_key.as_deref(), Some("gm-env"));
    assert_eq!(config.gemini.model, "gemini-2.0-pro");
    assert_eq!(config.timeout_seconds, Some(12));
    assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(12)));
    Ok(())
}

#[tokio::test]
async fn from_env_treats_empty_key_as_missing() -> anyhow::Result<()> {
    let _guard = acquire_test_lock().await;
    let _env = clear_env();
    let _openai_key = EnvVarGuard::set(OPENAI_API_KEY, "");

    let config = Config::from_env()?;
    assert_eq!(config.openai.api_key, None);
    Ok(())
}

#[tokio::test]
async fn from_env_rejects_non_numeric_timeout() -> anyhow::Result<()> {
    let _guard = acquire_test_lock().await;
    let _env = clear_env();
    let _timeout = EnvVarGuard::set(TIMEOUT, "soon");

    let err = Config::from_env().unwrap_err();
    assert!(
        err.to_string()
            .starts_with("SUMMARIZER_TIMEOUT_SECONDS is not a number:"),
        "unexpected error: {err}"
    );
    Ok(())
}
