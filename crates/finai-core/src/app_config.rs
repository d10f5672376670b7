use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// `None` selects the in-process cache store.
    pub redis_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub financial_model_url: Option<String>,
    pub general_model_url: Option<String>,
    pub ner_url: Option<String>,
    pub model_timeout_ms: u64,
    pub model_max_retries: u32,
    pub rate_limit_sentiment_per_min: usize,
    pub rate_limit_recommend_per_min: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[redacted]"))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("financial_model_url", &self.financial_model_url)
            .field("general_model_url", &self.general_model_url)
            .field("ner_url", &self.ner_url)
            .field("model_timeout_ms", &self.model_timeout_ms)
            .field("model_max_retries", &self.model_max_retries)
            .field(
                "rate_limit_sentiment_per_min",
                &self.rate_limit_sentiment_per_min,
            )
            .field(
                "rate_limit_recommend_per_min",
                &self.rate_limit_recommend_per_min,
            )
            .finish()
    }
}
