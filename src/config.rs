//! Runtime settings read from the environment (and an optional `.env` file).

pub const DEFAULT_BASE_URL: &str = "https://api.bcb.gov.br/dados/serie";

const ENV_BASE_URL: &str = "BCB_BASE_URL";
const ENV_USER_AGENT: &str = "BCB_USER_AGENT";

/// Settings for the BCB client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base of the SGS API; series paths are appended to it.
    pub base_url: String,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and apply `BCB_BASE_URL` / `BCB_USER_AGENT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut settings = Self::default();
        if let Some(url) = non_empty_var(ENV_BASE_URL) {
            settings.base_url = url;
        }
        if let Some(agent) = non_empty_var(ENV_USER_AGENT) {
            settings.user_agent = agent;
        }
        settings
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_user_agent() -> String {
    format!("painel/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_api() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "https://api.bcb.gov.br/dados/serie");
        assert!(settings.user_agent.starts_with("painel/"));
    }

    #[test]
    fn base_url_override() {
        let settings = Settings::default().with_base_url("http://127.0.0.1:9999");
        assert_eq!(settings.base_url, "http://127.0.0.1:9999");
    }
}
