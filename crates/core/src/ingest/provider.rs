use crate::config::Settings;
use crate::domain::market::RankingKind;
use crate::ingest::types::{MarketRankingResponse, RawStockDetail, ThemeSentimentResponse};
use crate::store::{keys, KeyValueStore};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;

#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_rankings(
        &self,
        market: &str,
        kind: RankingKind,
    ) -> Result<MarketRankingResponse>;

    async fn fetch_stock(&self, symbol: &str) -> Result<RawStockDetail>;

    async fn fetch_theme_sentiment(&self) -> Result<ThemeSentimentResponse>;
}

#[derive(Clone)]
pub struct HttpJsonMarketClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retries: u32,

    // Injected session store; carries the user's upstream access token when
    // one has been issued.
    token_store: Option<Arc<dyn KeyValueStore>>,
}

impl HttpJsonMarketClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_market_api_base_url()?.to_string();
        let api_key = settings.market_api_key.clone();

        let timeout_secs = std::env::var("MARKET_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("MARKET_API_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market api http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            retries,
            token_store: None,
        })
    }

    pub fn with_token_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }

        if let Some(store) = &self.token_store {
            if let Some(token) = store.get(keys::ACCESS_TOKEN).await? {
                headers.insert(
                    "authorization",
                    HeaderValue::from_str(&format!("Bearer {token}"))?,
                );
            }
        }

        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.get_json_once::<T>(path).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, path, error = %err, "market api fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let headers = self.headers().await?;

        let res = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .context("market api request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market api response")?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                // A stale session token also poisons retries; drop it so the
                // next attempt goes out anonymous.
                if let Some(store) = &self.token_store {
                    let _ = store.remove(keys::ACCESS_TOKEN).await;
                }
            }
            anyhow::bail!("market api HTTP {status} for {path}: {text}");
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("market api response is not valid JSON for {path}: {text}"))
    }
}

#[async_trait::async_trait]
impl MarketDataClient for HttpJsonMarketClient {
    fn provider_name(&self) -> &'static str {
        "market_http_json"
    }

    async fn fetch_rankings(
        &self,
        market: &str,
        kind: RankingKind,
    ) -> Result<MarketRankingResponse> {
        let market = market.trim().to_ascii_uppercase();
        let path = format!("/v1/markets/{market}/rankings/{}", kind.as_str());
        let parsed: MarketRankingResponse = self.get_json(&path).await?;
        validate_rankings(&parsed)?;
        Ok(parsed)
    }

    async fn fetch_stock(&self, symbol: &str) -> Result<RawStockDetail> {
        let symbol = symbol.trim();
        anyhow::ensure!(!symbol.is_empty(), "symbol must be non-empty");

        let path = format!("/v1/stocks/{symbol}");
        let parsed: RawStockDetail = self.get_json(&path).await?;
        anyhow::ensure!(
            !parsed.symbol.trim().is_empty(),
            "stock detail symbol must be non-empty"
        );
        Ok(parsed)
    }

    async fn fetch_theme_sentiment(&self) -> Result<ThemeSentimentResponse> {
        self.get_json("/v1/themes/sentiment").await
    }
}

fn validate_rankings(resp: &MarketRankingResponse) -> Result<()> {
    anyhow::ensure!(
        !resp.market.trim().is_empty(),
        "ranking market must be non-empty"
    );
    for row in &resp.rows {
        anyhow::ensure!(
            !row.symbol.trim().is_empty(),
            "ranking row symbol must be non-empty"
        );
        anyhow::ensure!(
            !row.name.trim().is_empty(),
            "ranking row name must be non-empty (symbol={})",
            row.symbol
        );
    }
    Ok(())
}
