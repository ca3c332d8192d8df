use barcode_match_report::api::{self, AppState};
use barcode_match_report::{AppConfig, ReportService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 报表服务: 每个请求使用各自的表与索引, 服务本身只持有列名配置
    let state = AppState {
        reports: Arc::new(ReportService::new(config.columns.clone())),
        upload: config.upload.clone(),
    };
    let app = api::router(state);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("Endpoints:");
    info!("  GET  /                  - upload form");
    info!("  POST /                  - matched report download (xlsx/csv)");
    info!("  POST /api/report/stats  - match statistics (JSON)");
    info!("  GET  /health");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
