use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockmood_core::domain::market::{normalize_ranking_rows, Market, RankingKind};
use stockmood_core::domain::sentiment::{build_theme_outlooks, integrated_mood, MoodThresholds};
use stockmood_core::format::format_price;
use stockmood_core::ingest::provider::{HttpJsonMarketClient, MarketDataClient};
use stockmood_core::time::market_date::resolve_snapshot_date;

/// One fetch-and-normalize pass against the upstream market API, printed as
/// JSON. Smoke-tests the upstream contract without running the server.
#[derive(Debug, Parser)]
#[command(name = "stockmood_cli")]
struct Args {
    /// Market to query (KOSPI, KOSDAQ, NASDAQ).
    #[arg(long, default_value = "KOSPI")]
    market: String,

    /// Ranking kind (gainers or losers).
    #[arg(long, default_value = "gainers")]
    kind: String,

    /// Also fetch theme sentiment and print the integrated mood.
    #[arg(long)]
    mood: bool,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stockmood_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let kind = RankingKind::from_label(&args.kind)
        .with_context(|| format!("unknown ranking kind: {}", args.kind))?;
    let market = Market::from_label(&args.market)
        .with_context(|| format!("unknown market: {}", args.market))?;

    let client = HttpJsonMarketClient::from_settings(&settings)?;

    let snapshot_date = resolve_snapshot_date(market, chrono::Utc::now())?;

    let resp = client.fetch_rankings(market.label(), kind).await;
    let resp = match resp {
        Ok(resp) => resp,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(market = market.label(), kind = kind.as_str(), error = %err, "rankings fetch failed");
            return Err(err);
        }
    };

    let rows: Vec<_> = normalize_ranking_rows(&resp.rows, kind)
        .into_iter()
        .map(|row| {
            json!({
                "symbol": row.symbol,
                "name": row.name,
                "price": row.price,
                "price_display": format_price(&resp.market, row.price),
                "change_pct": row.change_pct,
            })
        })
        .collect();

    let mut out = json!({
        "market": resp.market,
        "kind": kind.as_str(),
        "snapshot_date": snapshot_date,
        "as_of": resp.as_of,
        "rows": rows,
    });

    if args.mood {
        let thresholds = MoodThresholds::from_env();
        let sentiment = client.fetch_theme_sentiment().await;
        match sentiment {
            Ok(sentiment) => {
                let themes = build_theme_outlooks(&sentiment.themes, &thresholds);
                let overall = integrated_mood(&themes, &thresholds);
                out["mood"] = json!({
                    "overall": overall,
                    "themes": themes,
                });
            }
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::warn!(error = %err, "theme sentiment fetch failed; printing rankings only");
            }
        }
    }

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    };
    println!("{rendered}");

    tracing::info!(
        market = market.label(),
        kind = kind.as_str(),
        %snapshot_date,
        rows = out["rows"].as_array().map(|a| a.len()).unwrap_or(0),
        "snapshot printed"
    );

    Ok(())
}

fn init_sentry(settings: &stockmood_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
