use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use stockmood_core::domain::market::{
    normalize_ranking_rows, NormalizedStockRow, RankingKind, RankingRow,
};
use stockmood_core::domain::query::{parse_query_text, QueryTextProfile};
use stockmood_core::domain::sentiment::{
    build_theme_outlooks, integrated_mood, MoodLabel, MoodThresholds, ThemeOutlook,
};
use stockmood_core::format::{format_datetime, format_price};
use stockmood_core::ingest::provider::{HttpJsonMarketClient, MarketDataClient};
use stockmood_core::store::{
    stash_chat_draft, take_chat_draft, KeyValueStore, MemoryKeyValueStore,
};

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

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());

    let client: Option<Arc<dyn MarketDataClient>> = match HttpJsonMarketClient::from_settings(
        &settings,
    ) {
        Ok(client) => Some(Arc::new(client.with_token_store(store.clone()))),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "market api client unavailable; starting in degraded mode");
            None
        }
    };

    let state = AppState {
        client,
        store,
        thresholds: MoodThresholds::from_env(),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/markets/:market/rankings/:kind", get(get_rankings))
        .route("/stocks/:symbol", get(get_stock))
        .route("/themes/outlook", get(get_theme_outlook))
        .route("/profile/query-text", post(post_query_text))
        .route("/chat/draft", post(post_chat_draft).get(get_chat_draft))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    client: Option<Arc<dyn MarketDataClient>>,
    store: Arc<dyn KeyValueStore>,
    thresholds: MoodThresholds,
}

impl AppState {
    fn client(&self) -> Result<&Arc<dyn MarketDataClient>, StatusCode> {
        self.client.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[derive(Debug, Serialize)]
struct ApiRankingSnapshot {
    snapshot_id: Uuid,
    provider: String,
    market: String,
    kind: String,
    as_of: Option<String>,
    rows: Vec<ApiRankingRow>,
}

#[derive(Debug, Serialize)]
struct ApiRankingRow {
    #[serde(flatten)]
    row: RankingRow,
    price_display: Option<String>,
}

async fn get_rankings(
    State(state): State<AppState>,
    Path((market, kind)): Path<(String, String)>,
) -> Result<Json<ApiRankingSnapshot>, StatusCode> {
    let client = state.client()?;
    let kind = RankingKind::from_label(&kind).ok_or(StatusCode::BAD_REQUEST)?;

    let resp = client
        .fetch_rankings(&market, kind)
        .await
        .map_err(upstream_error)?;

    let rows = normalize_ranking_rows(&resp.rows, kind)
        .into_iter()
        .map(|row| ApiRankingRow {
            price_display: format_price(&resp.market, row.price),
            row,
        })
        .collect();

    Ok(Json(ApiRankingSnapshot {
        snapshot_id: Uuid::new_v4(),
        provider: client.provider_name().to_string(),
        market: resp.market.clone(),
        kind: kind.as_str().to_string(),
        as_of: resp.as_of.as_deref().map(format_datetime),
        rows,
    }))
}

#[derive(Debug, Serialize)]
struct ApiStockView {
    snapshot_id: Uuid,
    provider: String,
    #[serde(flatten)]
    row: NormalizedStockRow,
    price_display: Option<String>,
}

async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiStockView>, StatusCode> {
    let client = state.client()?;

    let raw = client.fetch_stock(&symbol).await.map_err(upstream_error)?;
    let row = NormalizedStockRow::from_raw(&raw);

    Ok(Json(ApiStockView {
        snapshot_id: Uuid::new_v4(),
        provider: client.provider_name().to_string(),
        price_display: format_price(&row.exchange, row.close),
        row,
    }))
}

#[derive(Debug, Serialize)]
struct ApiThemeOutlook {
    snapshot_id: Uuid,
    provider: String,
    generated_at: Option<String>,
    overall: MoodLabel,
    themes: Vec<ThemeOutlook>,
}

async fn get_theme_outlook(
    State(state): State<AppState>,
) -> Result<Json<ApiThemeOutlook>, StatusCode> {
    let client = state.client()?;

    let resp = client
        .fetch_theme_sentiment()
        .await
        .map_err(upstream_error)?;

    let themes = build_theme_outlooks(&resp.themes, &state.thresholds);
    let overall = integrated_mood(&themes, &state.thresholds);

    Ok(Json(ApiThemeOutlook {
        snapshot_id: Uuid::new_v4(),
        provider: client.provider_name().to_string(),
        generated_at: resp.generated_at.as_deref().map(format_datetime),
        overall,
        themes,
    }))
}

#[derive(Debug, Deserialize)]
struct QueryTextRequest {
    text: String,
}

async fn post_query_text(Json(req): Json<QueryTextRequest>) -> Json<QueryTextProfile> {
    Json(parse_query_text(&req.text))
}

#[derive(Debug, Deserialize)]
struct ChatDraftRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatDraftResponse {
    text: Option<String>,
}

async fn post_chat_draft(
    State(state): State<AppState>,
    Json(req): Json<ChatDraftRequest>,
) -> Result<StatusCode, StatusCode> {
    stash_chat_draft(state.store.as_ref(), &req.text)
        .await
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_chat_draft(
    State(state): State<AppState>,
) -> Result<Json<ChatDraftResponse>, StatusCode> {
    let text = take_chat_draft(state.store.as_ref())
        .await
        .map_err(internal_error)?;
    Ok(Json(ChatDraftResponse { text }))
}

fn upstream_error(e: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&e);
    tracing::error!(error = %e, "upstream market api call failed");
    StatusCode::BAD_GATEWAY
}

fn internal_error(e: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&e);
    tracing::error!(error = %e, "request handling failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
