use crate::auth::DynSessionResolver;
use crate::db::DynPurchaseOrderStore;
use crate::error::AppError;
use crate::models::{
    PurchaseOrderFilter, PurchaseOrderRecord, SupplierAggregate, TopSupplier,
    TopSuppliersResponse,
};
use axum::http::HeaderMap;
use bigdecimal::{BigDecimal, Zero};
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use indexmap::IndexMap;

/// 排行榜长度
pub const TOP_SUPPLIER_LIMIT: usize = 10;

/// 当月时间窗口 [月初 00:00:00, 月末 23:59:59], 两端闭区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// 按 `now` 所在时区计算其所属自然月
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<Self, AppError> {
        let tz = now.timezone();
        let (year, month) = (now.year(), now.month());

        let first_day = NaiveDate::from_ymd_opt(year, month, 1);
        let next_first_day = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_first_day.and_then(|d| d.pred_opt());

        let (Some(start_naive), Some(end_naive)) = (
            first_day.and_then(|d| d.and_hms_opt(0, 0, 0)),
            last_day.and_then(|d| d.and_hms_opt(23, 59, 59)),
        ) else {
            return Err(AppError::Internal(format!(
                "cannot compute month window for {year}-{month}"
            )));
        };

        let start = resolve_local(&tz, start_naive, |r| r.earliest());
        let end = resolve_local(&tz, end_naive, |r| r.latest());
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self {
                start: start.with_timezone(&Utc),
                end: end.with_timezone(&Utc),
            }),
            _ => Err(AppError::Internal(format!(
                "month boundary of {year}-{month} does not exist in local time"
            ))),
        }
    }

    pub fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        at.is_some_and(|at| self.start <= at && at <= self.end)
    }
}

/// 本地时间落在夏令时跳变空档时, 顺延到空档之后的第一个有效时刻
fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    pick: impl Fn(LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>>,
) -> Option<DateTime<Tz>> {
    pick(tz.from_local_datetime(&naive))
        .or_else(|| pick(tz.from_local_datetime(&(naive + Duration::hours(1)))))
}

/// 按供应商汇总, 保持首次出现顺序
pub fn aggregate_by_supplier(
    records: Vec<PurchaseOrderRecord>,
    window: &MonthWindow,
) -> Vec<SupplierAggregate> {
    let mut supplier_map: IndexMap<String, SupplierAggregate> = IndexMap::new();

    for po in records {
        let is_current_month = window.contains(po.approved_at);
        let entry = supplier_map
            .entry(po.supplier_id.clone())
            .or_insert_with(|| SupplierAggregate {
                supplier_id: po.supplier_id,
                name: po.supplier.name,
                total_spent: BigDecimal::zero(),
                monthly_spent: BigDecimal::zero(),
                po_count: 0,
            });

        if is_current_month {
            entry.monthly_spent += po.total_amount.clone();
        }
        entry.total_spent += po.total_amount;
        entry.po_count += 1;
    }

    supplier_map.into_values().collect()
}

/// 按总金额降序排序并截取前 `limit` 个 (稳定排序, 并列时保持汇总顺序)
pub fn rank_top_suppliers(
    mut aggregates: Vec<SupplierAggregate>,
    limit: usize,
) -> Vec<TopSupplier> {
    aggregates.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    aggregates.truncate(limit);
    aggregates.into_iter().map(TopSupplier::from).collect()
}

/// 供应商消费排行服务
pub struct ReportService {
    sessions: DynSessionResolver,
    store: DynPurchaseOrderStore,
}

impl ReportService {
    pub fn new(sessions: DynSessionResolver, store: DynPurchaseOrderStore) -> Self {
        Self { sessions, store }
    }

    /// 使用进程本地时钟计算当月窗口
    pub async fn top_suppliers(
        &self,
        headers: &HeaderMap,
    ) -> Result<TopSuppliersResponse, AppError> {
        self.top_suppliers_at(headers, Local::now()).await
    }

    pub async fn top_suppliers_at<Tz>(
        &self,
        headers: &HeaderMap,
        now: DateTime<Tz>,
    ) -> Result<TopSuppliersResponse, AppError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        // 1. 鉴权: 未登录直接拒绝, 不访问数据源
        let session = self.sessions.resolve(headers).await?;
        let Some(user) = session.and_then(|s| s.user) else {
            return Err(AppError::Unauthorized);
        };

        // 2. 查询已审批采购单 (USER 角色仅限本人创建)
        let filter = PurchaseOrderFilter::for_session_user(&user);
        let records = self.store.find_purchase_orders(&filter).await?;
        tracing::debug!(
            "user {} ({}) fetched {} approved purchase orders",
            user.id,
            user.role,
            records.len()
        );

        // 3. 汇总, 排序, 截取
        let window = MonthWindow::containing(&now)?;
        let aggregates = aggregate_by_supplier(records, &window);
        let top_suppliers = rank_top_suppliers(aggregates, TOP_SUPPLIER_LIMIT);
        tracing::info!("top suppliers report: {} suppliers", top_suppliers.len());

        Ok(TopSuppliersResponse { top_suppliers })
    }
}
