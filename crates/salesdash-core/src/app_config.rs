use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where daily sales series come from.
///
/// `Fixture` serves the dataset bundled with the session crate and never
/// touches the network. `Live` calls the daily-sales-overview endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SalesSource {
    #[default]
    Fixture,
    Live,
}

impl std::fmt::Display for SalesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SalesSource::Fixture => write!(f, "fixture"),
            SalesSource::Live => write!(f, "live"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub state_path: PathBuf,
    pub sales_source: SalesSource,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("state_path", &self.state_path)
            .field("sales_source", &self.sales_source)
            .finish()
    }
}
