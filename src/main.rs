use procurement_report::auth::JwtSessionResolver;
use procurement_report::db::PgPurchaseOrderStore;
use procurement_report::{build_router, create_pool, AppConfig, AppState, ReportService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let report = ReportService::new(
        Arc::new(JwtSessionResolver::new(&config.auth.jwt_secret)),
        Arc::new(PgPurchaseOrderStore::new(pool)),
    );
    let app = build_router(AppState {
        report: Arc::new(report),
    });

    // 启动服务器
    let addr = config.listen_addr();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET /api/dashboard/top-suppliers  - top 10 suppliers by approved spend");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
