use crate::ingest::types::{RawMarketRow, RawStockDetail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Markets whose quotes this service understands. Anything else is carried
/// through as an opaque label with no currency attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Kospi,
    Kosdaq,
    Nasdaq,
}

impl Market {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "KOSPI" => Some(Market::Kospi),
            "KOSDAQ" => Some(Market::Kosdaq),
            "NASDAQ" => Some(Market::Nasdaq),
            _ => None,
        }
    }

    pub fn currency(&self) -> &'static str {
        match self {
            Market::Kospi | Market::Kosdaq => "KRW",
            Market::Nasdaq => "USD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Market::Kospi => "KOSPI",
            Market::Kosdaq => "KOSDAQ",
            Market::Nasdaq => "NASDAQ",
        }
    }
}

/// Normalize an ambiguous-scale change rate to percentage-points.
///
/// Upstream mixes ratio-scale (0.05 = +5%) and point-scale (5.0 = +5%)
/// encodings in the same field. Values with |x| <= 1.0 are read as ratios and
/// scaled by 100; larger magnitudes are passed through as points. Exactly 1.0
/// therefore reads as 100%, matching the upstream source of record.
pub fn normalize_change_pct(raw: Option<f64>) -> Option<f64> {
    let x = raw?;
    if x.is_nan() {
        return None;
    }
    if x.abs() <= 1.0 {
        Some(x * 100.0)
    } else {
        Some(x)
    }
}

/// Point-scale normalization for decline rankings. Upstream decline data is
/// expected non-positive; a positive value is a sign inconsistency and gets
/// negated instead of shown.
pub fn normalize_drop_pct(raw: Option<f64>) -> Option<f64> {
    let pct = normalize_change_pct(raw)?;
    if pct > 0.0 {
        Some(-pct)
    } else {
        Some(pct)
    }
}

/// One row of a rankings tape, change rate already in percentage-points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRow {
    pub symbol: String,
    pub name: String,
    pub price: Option<f64>,
    pub change_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingKind {
    Gainers,
    Losers,
}

impl RankingKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gainers" | "rise" | "up" => Some(RankingKind::Gainers),
            "losers" | "fall" | "down" => Some(RankingKind::Losers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingKind::Gainers => "gainers",
            RankingKind::Losers => "losers",
        }
    }
}

pub fn normalize_ranking_rows(rows: &[RawMarketRow], kind: RankingKind) -> Vec<RankingRow> {
    rows.iter()
        .map(|row| RankingRow {
            symbol: row.symbol.trim().to_string(),
            name: row.name.trim().to_string(),
            price: row.price.filter(|p| !p.is_nan()),
            change_pct: match kind {
                RankingKind::Gainers => normalize_change_pct(row.change_rate),
                RankingKind::Losers => normalize_drop_pct(row.change_rate),
            },
        })
        .collect()
}

/// Quote detail with every percentage field in percentage-points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedStockRow {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub currency: Option<String>,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub change_pct: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub as_of_date: Option<NaiveDate>,
}

impl NormalizedStockRow {
    pub fn from_raw(raw: &RawStockDetail) -> Self {
        let exchange = raw.exchange.as_deref().unwrap_or("").trim().to_string();
        let currency = Market::from_label(&exchange).map(|m| m.currency().to_string());

        Self {
            symbol: raw.symbol.trim().to_string(),
            name: raw.name.trim().to_string(),
            exchange,
            currency,
            open: raw.open.filter(|v| !v.is_nan()),
            close: raw.close.filter(|v| !v.is_nan()),
            change_pct: normalize_change_pct(raw.change_rate),
            market_cap: raw.market_cap.filter(|v| !v.is_nan()),
            volume: raw.volume.filter(|v| !v.is_nan()),
            as_of_date: raw
                .as_of_date
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        }
    }
}
