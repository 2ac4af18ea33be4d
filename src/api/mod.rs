pub mod handlers;

pub use handlers::{health_check, top_suppliers};

use crate::service::ReportService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub report: Arc<ReportService>,
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/dashboard/top-suppliers", get(top_suppliers))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
