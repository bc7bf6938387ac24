use std::sync::Arc;

use bolsa_market_data::{MarketDataProvider, YahooProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub market_data: Arc<dyn MarketDataProvider>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Build the shared application state.
///
/// The Yahoo adapter is configured exactly once here, at process start;
/// nothing mutates it afterwards.
pub fn build_state() -> anyhow::Result<Arc<AppState>> {
    let market_data = Arc::new(YahooProvider::new()?);
    Ok(Arc::new(AppState { market_data }))
}
