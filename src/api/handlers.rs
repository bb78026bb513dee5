use super::error::ApiError;
use crate::error::FinderError;
use crate::models::parse_targets;
use crate::service::{FinderRequest, InvoiceFinder, SearchControl};
use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<InvoiceFinder>,
    pub upload_dir: PathBuf,
    pub default_tolerance: i64,
    pub default_max_invoices: i64,
}

/// 请求体：已上传文件 ID + 逗号分隔的目标金额
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub upload_id: String,
    pub targets: String,
    pub tolerance: Option<i64>,
    pub max_invoices: Option<i64>,
}

/// 响应体
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessResponse {
    pub found: bool,
    pub total_rows: usize,
    pub file_name: Option<String>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传 ID 只允许 `[A-Za-z0-9_.-]`，且不能是 `.` 或 `..`
pub fn is_valid_upload_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// 请求 future 被丢弃 (客户端断开) 时取消阻塞线程上仍在运行的搜索
pub struct CancelOnDrop(Arc<SearchControl>);

impl CancelOnDrop {
    pub fn new(control: Arc<SearchControl>) -> Self {
        Self(control)
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if !self.0.is_cancelled() {
            self.0.cancel();
        }
    }
}

/// 查找组合：读取上传文件，在阻塞线程池上搜索并导出
pub async fn process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let request = FinderRequest::new(
        parse_targets(&req.targets),
        req.tolerance.unwrap_or(state.default_tolerance),
        req.max_invoices.unwrap_or(state.default_max_invoices),
    )?;

    if !is_valid_upload_id(&req.upload_id) {
        return Err(ApiError::bad_request("Upload id tidak valid."));
    }
    let source = state.upload_dir.join(&req.upload_id);
    if !source.is_file() {
        return Err(FinderError::SourceNotFound(req.upload_id).into());
    }

    tracing::info!(
        "处理 {}: 目标 {:?}, 容差 {}, 最多 {} 张",
        req.upload_id,
        request.targets,
        request.tolerance,
        request.max_invoices
    );

    let finder = state.finder.clone();
    let control = Arc::new(finder.search_control());
    let _guard = CancelOnDrop::new(control.clone());

    let task = move || finder.run_with_control(&source, &request, &control);
    let report = tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| {
            tracing::error!("搜索任务异常退出: {}", e);
            ApiError::internal()
        })??;

    let file_name = report
        .output_file
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());

    Ok(Json(ProcessResponse {
        found: report.found,
        total_rows: report.total_rows,
        file_name,
    }))
}
