use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ranking row as the upstream API ships it. `change_rate` arrives in an
/// ambiguous scale (ratio or percentage-points depending on the backend
/// revision); `payload` carries nested chart data we pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMarketRow {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub change_rate: Option<f64>,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRankingResponse {
    pub market: String,
    #[serde(default)]
    pub as_of: Option<String>,
    #[serde(default)]
    pub rows: Vec<RawMarketRow>,
}

/// Quote detail for a single symbol. Everything except the identity fields is
/// optional; the upstream omits whatever it could not source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStockDetail {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub change_rate: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub as_of_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawThemeSentiment {
    pub theme: String,
    #[serde(default)]
    pub theme_label: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSentimentResponse {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub themes: Vec<RawThemeSentiment>,
}
