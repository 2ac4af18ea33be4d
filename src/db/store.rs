use crate::error::AppError;
use crate::models::{PurchaseOrderFilter, PurchaseOrderRecord};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

pub type DynPurchaseOrderStore = Arc<dyn PurchaseOrderStore>;

/// 采购单数据源
#[async_trait]
pub trait PurchaseOrderStore: Send + Sync {
    /// 按条件查询采购单投影 (不分页, 全量返回)
    async fn find_purchase_orders(
        &self,
        filter: &PurchaseOrderFilter,
    ) -> Result<Vec<PurchaseOrderRecord>, AppError>;
}

/// Postgres 实现, 表结构沿用现有 "PurchaseOrder" / "Supplier" 表
pub struct PgPurchaseOrderStore {
    pool: PgPool,
}

impl PgPurchaseOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 构建查询语句; 仅对已设置的过滤字段追加条件
fn build_query(filter: &PurchaseOrderFilter) -> QueryBuilder<'_, Postgres> {
    let mut query_builder = QueryBuilder::new(
        r#"
        SELECT po."supplierId" AS supplier_id,
               po."totalAmount"::numeric AS total_amount,
               po."approvedAt" AT TIME ZONE 'UTC' AS approved_at,
               s."id" AS id,
               s."name" AS name
        FROM "PurchaseOrder" po
        INNER JOIN "Supplier" s ON s."id" = po."supplierId"
        WHERE TRUE"#,
    );

    if let Some(status) = filter.status_equals {
        query_builder
            .push(r#" AND po."status"::text = "#)
            .push_bind(status.as_str());
    }
    if let Some(created_by_id) = &filter.created_by_id_equals {
        query_builder
            .push(r#" AND po."createdById" = "#)
            .push_bind(created_by_id.as_str());
    }

    query_builder
}

#[async_trait]
impl PurchaseOrderStore for PgPurchaseOrderStore {
    async fn find_purchase_orders(
        &self,
        filter: &PurchaseOrderFilter,
    ) -> Result<Vec<PurchaseOrderRecord>, AppError> {
        let start_time = std::time::Instant::now();
        let mut query_builder = build_query(filter);

        let records = query_builder
            .build_query_as::<PurchaseOrderRecord>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            "查询采购单 {} 条, 耗时: {:?}",
            records.len(),
            start_time.elapsed()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PurchaseOrderStatus;

    #[test]
    fn unfiltered_query_has_no_predicates() {
        let filter = PurchaseOrderFilter::default();
        let query_builder = build_query(&filter);
        let sql = query_builder.sql();
        assert!(!sql.contains("$1"));
        assert!(sql.trim_end().ends_with("WHERE TRUE"));
    }

    #[test]
    fn binds_status_and_creator_in_order() {
        let filter = PurchaseOrderFilter {
            status_equals: Some(PurchaseOrderStatus::Approved),
            created_by_id_equals: Some("u-1".to_string()),
        };
        let query_builder = build_query(&filter);
        let sql = query_builder.sql();
        assert!(sql.contains(r#"po."status"::text = $1"#));
        assert!(sql.contains(r#"po."createdById" = $2"#));
    }
}
