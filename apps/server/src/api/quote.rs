use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bolsa_market_data::LiveQuote;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const COTACAO_ERROR: &str = "Não foi possível buscar a cotação.";
const MERCADO_ERROR: &str = "Não foi possível buscar os dados de mercado.";

const SP500_SYMBOL: &str = "^GSPC";
const IBOVESPA_SYMBOL: &str = "^BVSP";

/// Simplified quote view with the Portuguese field names of the public API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Cotacao {
    ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    nome: Option<String>,
    preco_atual: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    variacao_percentual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dividend_yield: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preco_min_52_semanas: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preco_max_52_semanas: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volume_medio: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moeda: Option<String>,
}

impl From<LiveQuote> for Cotacao {
    fn from(quote: LiveQuote) -> Self {
        Self {
            ticker: quote.symbol,
            nome: quote.long_name.or(quote.short_name),
            preco_atual: quote.regular_market_price,
            variacao_percentual: quote.regular_market_change_percent,
            dividend_yield: quote.dividend_yield,
            preco_min_52_semanas: quote.fifty_two_week_low,
            preco_max_52_semanas: quote.fifty_two_week_high,
            volume_medio: quote.average_volume,
            moeda: quote.currency,
        }
    }
}

async fn get_cotacao(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Cotacao>> {
    let quote = state.market_data.live_quote(&ticker).await.map_err(|e| {
        tracing::error!("Erro ao buscar cotação de {}: {}", ticker, e);
        ApiError::upstream(COTACAO_ERROR)
    })?;
    Ok(Json(Cotacao::from(quote)))
}

#[derive(Serialize)]
struct Mercado {
    sp500: LiveQuote,
    ibov: LiveQuote,
}

/// Snapshot of the two reference indices, fetched concurrently.
async fn get_mercado(State(state): State<Arc<AppState>>) -> ApiResult<Json<Mercado>> {
    let (sp500, ibov) = tokio::try_join!(
        state.market_data.live_quote(SP500_SYMBOL),
        state.market_data.live_quote(IBOVESPA_SYMBOL),
    )
    .map_err(|e| {
        tracing::error!("Erro ao buscar dados de mercado: {}", e);
        ApiError::upstream(MERCADO_ERROR)
    })?;
    Ok(Json(Mercado { sp500, ibov }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cotacao/{ticker}", get(get_cotacao))
        .route("/mercado", get(get_mercado))
}
