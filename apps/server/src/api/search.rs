use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const BUSCA_ERROR: &str = "Não foi possível realizar a busca.";
const TERMO_REQUIRED: &str = "O parâmetro \"termo\" é obrigatório.";

#[derive(Deserialize)]
struct BuscaQuery {
    termo: Option<String>,
}

async fn get_busca(
    State(state): State<Arc<AppState>>,
    Query(q): Query<BuscaQuery>,
) -> ApiResult<Json<Value>> {
    let termo = q
        .termo
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request(TERMO_REQUIRED))?;

    let results = state.market_data.search(&termo).await.map_err(|e| {
        tracing::error!("Erro ao buscar por '{}': {}", termo, e);
        ApiError::upstream(BUSCA_ERROR)
    })?;
    Ok(Json(results))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/busca", get(get_busca))
}
