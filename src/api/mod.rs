pub mod handlers;
pub mod page;

use crate::config::UploadConfig;
use crate::service::ReportService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

pub use handlers::{generate_report, health_check, index, report_stats};

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportService>,
    pub upload: UploadConfig,
}

/// 构建路由, 请求体上限来自上传配置
pub fn router(state: AppState) -> Router {
    let body_limit = state.upload.max_bytes;

    Router::new()
        .route("/", get(index).post(generate_report))
        .route("/api/report/stats", post(report_stats))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(body_limit)))
        .with_state(state)
}
