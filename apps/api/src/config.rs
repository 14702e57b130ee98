use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the resume parse / save / suggestion service.
    pub collaborator_url: String,
    pub collaborator_timeout_secs: u64,
    pub max_sessions: usize,
    /// Sessions with no requests for this long are reclaimed.
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            collaborator_url: std::env::var("COLLABORATOR_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            collaborator_timeout_secs: parse_env("COLLABORATOR_TIMEOUT_SECS", 30)?,
            max_sessions: parse_env("MAX_SESSIONS", 256)?,
            session_idle_secs: parse_env("SESSION_IDLE_SECS", 1800)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            collaborator_url: "http://localhost:8000".to_string(),
            collaborator_timeout_secs: 30,
            max_sessions: 256,
            session_idle_secs: 1800,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("STUDIO_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("STUDIO_TEST_BAD_NUMBER", "eighty");
        let result: Result<u16> = parse_env("STUDIO_TEST_BAD_NUMBER", 8080);
        assert!(result.is_err());
        std::env::remove_var("STUDIO_TEST_BAD_NUMBER");
    }
}
