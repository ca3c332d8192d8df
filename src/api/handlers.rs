use super::{page, AppState};
use crate::config::UploadConfig;
use crate::error::ReportError;
use crate::models::{MatchReport, ReportStats, TableRole};
use crate::service::ReportInputs;
use crate::tabular::{read_table, render, report_file_name, OutputFormat};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Json, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

/// 统计接口响应体
#[derive(Debug, Serialize)]
pub struct ReportStatsResponse {
    pub success: bool,
    pub message: String,
    pub stats: Option<ReportStats>,
}

/// 上传的单个文件, 仅存在于本次请求的内存中
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// 解析后的上传表单
#[derive(Debug, Default)]
pub struct ReportUpload {
    pub top_file: Option<UploadedFile>,
    pub sold_file: Option<UploadedFile>,
    pub stock_file: Option<UploadedFile>,
    pub format: OutputFormat,
}

impl ReportUpload {
    /// 读取 multipart 表单; 未选择文件的字段 (文件名为空) 视为缺失
    pub async fn from_multipart(
        mut multipart: Multipart,
        limits: &UploadConfig,
    ) -> Result<Self, ReportError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limits))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "top_file" | "sold_file" | "stock_file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(|e| multipart_error(e, limits))?;
                    if file_name.is_empty() {
                        continue;
                    }
                    let file = Some(UploadedFile { file_name, bytes });
                    match name.as_str() {
                        "top_file" => form.top_file = file,
                        "sold_file" => form.sold_file = file,
                        _ => form.stock_file = file,
                    }
                }
                "format" => {
                    let value = field.text().await.map_err(|e| multipart_error(e, limits))?;
                    form.format = OutputFormat::from_form(&value);
                }
                other => tracing::debug!("ignoring form field {:?}", other),
            }
        }

        Ok(form)
    }

    /// 解码上传文件; 商品目录与销售表缺一不可
    pub fn into_inputs(self) -> Result<(ReportInputs, OutputFormat), ReportError> {
        let (Some(top), Some(sold)) = (self.top_file, self.sold_file) else {
            return Err(ReportError::MissingUpload);
        };

        let reference = read_table(TableRole::Reference, &top.file_name, &top.bytes)?;
        let transactions = read_table(TableRole::Transaction, &sold.file_name, &sold.bytes)?;
        let stock = self
            .stock_file
            .map(|file| read_table(TableRole::Stock, &file.file_name, &file.bytes))
            .transpose()?;

        let inputs = ReportInputs {
            reference,
            transactions,
            stock,
        };
        Ok((inputs, self.format))
    }
}

fn multipart_error(err: MultipartError, limits: &UploadConfig) -> ReportError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ReportError::PayloadTooLarge {
            limit_mb: limits.max_megabytes(),
        }
    } else {
        ReportError::Multipart(err.body_text())
    }
}

/// 错误对应的 HTTP 状态码
pub fn status_for(err: &ReportError) -> StatusCode {
    match err {
        ReportError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ReportError::ColumnNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ReportError::MissingUpload
        | ReportError::Multipart(_)
        | ReportError::MissingHeader { .. }
        | ReportError::RaggedRow { .. }
        | ReportError::Csv { .. }
        | ReportError::Spreadsheet { .. }
        | ReportError::EmptyWorkbook { .. } => StatusCode::BAD_REQUEST,
        ReportError::XlsxWrite(_) | ReportError::CsvWrite(_) | ReportError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 面向用户的错误信息
pub fn user_message(err: &ReportError) -> String {
    match err {
        ReportError::MissingUpload | ReportError::PayloadTooLarge { .. } => err.to_string(),
        _ => format!("An error occurred: {}", err),
    }
}

async fn build_report(
    state: &AppState,
    multipart: Multipart,
) -> Result<(MatchReport, OutputFormat), ReportError> {
    let upload = ReportUpload::from_multipart(multipart, &state.upload).await?;
    let (inputs, format) = upload.into_inputs()?;
    let report = state.reports.generate(inputs)?;
    Ok((report, format))
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传表单
pub async fn index() -> Html<String> {
    Html(page::render(None))
}

/// 生成报表并以附件返回; 失败时重新渲染表单并显示错误
pub async fn generate_report(State(state): State<AppState>, multipart: Multipart) -> Response {
    let rendered = build_report(&state, multipart)
        .await
        .and_then(|(report, format)| Ok((render(format, &report.rows)?, format)));

    match rendered {
        Ok((body, format)) => {
            let file_name = report_file_name(format, chrono::Local::now().naive_local());
            tracing::info!("report {} ready, {} bytes", file_name, body.len());
            let headers = [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ];
            (StatusCode::OK, headers, body).into_response()
        }
        Err(e) => {
            tracing::error!("report generation failed: {}", e);
            let html = page::render(Some(&user_message(&e)));
            (status_for(&e), Html(html)).into_response()
        }
    }
}

/// 只返回匹配统计 (JSON)
pub async fn report_stats(State(state): State<AppState>, multipart: Multipart) -> Response {
    match build_report(&state, multipart).await {
        Ok((report, _)) => {
            let stats = report.stats;
            let response = ReportStatsResponse {
                success: true,
                message: format!(
                    "Matched {} of {} transactions, {} ambiguous codes",
                    stats.matched, stats.transactions, stats.ambiguous_codes
                ),
                stats: Some(stats),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("report stats failed: {}", e);
            let response = ReportStatsResponse {
                success: false,
                message: user_message(&e),
                stats: None,
            };
            (status_for(&e), Json(response)).into_response()
        }
    }
}
