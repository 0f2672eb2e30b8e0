pub mod domain;
pub mod format;
pub mod ingest;
pub mod store;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub market_api_base_url: Option<String>,
        pub market_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                market_api_base_url: std::env::var("MARKET_API_BASE_URL").ok(),
                market_api_key: std::env::var("MARKET_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_market_api_base_url(&self) -> anyhow::Result<&str> {
            self.market_api_base_url
                .as_deref()
                .context("MARKET_API_BASE_URL is required")
        }
    }
}
