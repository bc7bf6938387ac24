use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use bolsa_market_data::HistoricalQuote;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const HISTORICO_ERROR: &str = "Não foi possível buscar o histórico de preços.";
const GRAFICO_ERROR: &str = "Não foi possível buscar os dados de dividendos.";
const MISSING_RANGE: &str =
    "Os parâmetros \"inicio\" e \"fim\" são obrigatórios no formato YYYY-MM-DD.";
const INVALID_DATES: &str = "Datas inválidas. Use o formato YYYY-MM-DD.";

const DEFAULT_INTERVAL: &str = "1d";

/// Parse a `YYYY-MM-DD` date string to Unix seconds (midnight UTC).
///
/// This is the only date validation the API performs; no range or calendar
/// checks beyond what the format parse implies.
fn parse_unix_date(value: &str) -> Result<i64, ApiError> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(INVALID_DATES))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Append the B3 suffix when absent.
///
/// Only the histórico route normalizes tickers this way; cotacao, sumario and
/// grafico pass tickers through untouched (kept as-is from the original API
/// contract, see DESIGN.md).
fn normalize_b3_ticker(ticker: &str) -> String {
    if ticker.ends_with(".SA") {
        ticker.to_string()
    } else {
        format!("{}.SA", ticker)
    }
}

#[derive(Deserialize)]
struct HistoricoQuery {
    intervalo: Option<String>,
    inicio: Option<String>,
    fim: Option<String>,
}

async fn get_historico(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(q): Query<HistoricoQuery>,
) -> ApiResult<Json<Value>> {
    let (Some(inicio), Some(fim)) = (q.inicio, q.fim) else {
        return Err(ApiError::bad_request(MISSING_RANGE));
    };
    let period1 = parse_unix_date(&inicio)?;
    let period2 = parse_unix_date(&fim)?;

    let symbol = normalize_b3_ticker(&ticker);
    let intervalo = q.intervalo.unwrap_or_else(|| DEFAULT_INTERVAL.to_string());

    let chart = state
        .market_data
        .chart(&symbol, &intervalo, period1, period2)
        .await
        .map_err(|e| {
            tracing::error!("Erro ao buscar histórico de {}: {}", symbol, e);
            ApiError::upstream_with_detail(HISTORICO_ERROR, e.to_string())
        })?;
    Ok(Json(chart))
}

#[derive(Deserialize)]
struct GraficoQuery {
    inicio: Option<String>,
    fim: Option<String>,
}

async fn get_grafico(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(q): Query<GraficoQuery>,
) -> ApiResult<Json<Vec<HistoricalQuote>>> {
    // A missing date fails the same validation as a malformed one.
    let period1 = parse_unix_date(q.inicio.as_deref().unwrap_or_default())?;
    let period2 = parse_unix_date(q.fim.as_deref().unwrap_or_default())?;

    let bars = state
        .market_data
        .daily_history(&ticker, period1, period2)
        .await
        .map_err(|e| {
            tracing::error!("Erro ao buscar série histórica de {}: {}", ticker, e);
            ApiError::upstream(GRAFICO_ERROR)
        })?;
    Ok(Json(bars))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/historico/{ticker}", get(get_historico))
        .route("/grafico/{ticker}", get(get_grafico))
}
