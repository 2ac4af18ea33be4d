use super::AppState;
use crate::error::AppError;
use crate::models::TopSuppliersResponse;
use axum::{
    extract::{Json, State},
    http::HeaderMap,
};

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 供应商消费排行 (前10名)
pub async fn top_suppliers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TopSuppliersResponse>, AppError> {
    let response = state.report.top_suppliers(&headers).await?;
    Ok(Json(response))
}
