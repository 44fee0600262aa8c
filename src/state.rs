use std::sync::Arc;

use crate::analysis::MarketAnalyzer;
use crate::catalog::CatalogClient;

/// Shared, read-only application state. Built once at startup; every request
/// only clones the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub analyzer: Arc<MarketAnalyzer>,
}
