pub mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::*;

use crate::config::AppConfig;
use crate::service::InvoiceFinder;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            finder: Arc::new(InvoiceFinder::from_config(&config.finder)),
            upload_dir: config.finder.upload_dir.clone(),
            default_tolerance: config.finder.default_tolerance,
            default_max_invoices: config.finder.default_max_invoices,
        }
    }
}

/// 构建路由。搜索是 CPU 密集型，限制同时进行的数量
pub fn router(state: AppState, max_concurrent_searches: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/process",
            post(process).layer(ConcurrencyLimitLayer::new(max_concurrent_searches.max(1))),
        )
        .with_state(state)
}
