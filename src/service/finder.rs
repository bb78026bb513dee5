use super::control::SearchControl;
use super::search::search_with_control;
use crate::config::FinderConfig;
use crate::error::{ExportError, FinderError};
use crate::ingest::{ingest, ingest_path, IngestOptions, IngestedTable, RawTable};
use crate::models::{MatchResult, Target, MAX_INVOICES_CAP};
use crate::report::ResultTable;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 单次查找请求：目标列表 + 共用容差 + 组合上限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderRequest {
    pub targets: Vec<i64>,
    pub tolerance: i64,
    pub max_invoices: usize,
}

impl FinderRequest {
    /// 容差截断到 >= 0，组合上限截断到 [1, 20]；目标必须至少有一个正数
    pub fn new(
        targets: Vec<i64>,
        tolerance: i64,
        max_invoices: i64,
    ) -> Result<Self, FinderError> {
        let targets: Vec<i64> = targets.into_iter().filter(|t| *t > 0).collect();
        if targets.is_empty() {
            return Err(FinderError::InvalidRequest(
                "target must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            targets,
            tolerance: tolerance.max(0),
            max_invoices: max_invoices.clamp(1, MAX_INVOICES_CAP as i64) as usize,
        })
    }

    pub fn to_targets(&self) -> Vec<Target> {
        self.targets
            .iter()
            .map(|&amount| Target::new(amount, self.tolerance, self.max_invoices))
            .collect()
    }

    pub fn is_multi_target(&self) -> bool {
        self.targets.len() > 1
    }
}

/// 搜索结果 (尚未落盘)
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub results: Vec<MatchResult>,
    pub multi_target: bool,
}

impl MatchReport {
    /// 是否有任何目标命中。没有命中不是错误
    pub fn found(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.results.len()
    }

    pub fn to_table(&self) -> ResultTable {
        ResultTable::from_results(&self.results, self.multi_target)
    }
}

/// 纯内存流程：清洗一次，所有目标共享同一份记录
pub fn find_combinations(
    table: &IngestedTable,
    request: &FinderRequest,
    control: &SearchControl,
) -> Result<MatchReport, FinderError> {
    let targets = request.to_targets();
    let results = search_with_control(&table.records, &targets, control)?;
    Ok(MatchReport {
        results,
        multi_target: request.is_multi_target(),
    })
}

/// 落盘后的查找结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinderReport {
    pub found: bool,
    pub total_rows: usize,
    pub output_file: Option<PathBuf>,
}

/// 查找服务：读取源文件 -> 搜索 -> 导出结果表
#[derive(Debug, Clone)]
pub struct InvoiceFinder {
    output_dir: PathBuf,
    search_timeout: Option<Duration>,
    ingest_options: IngestOptions,
}

impl InvoiceFinder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            search_timeout: None,
            ingest_options: IngestOptions::default(),
        }
    }

    pub fn from_config(config: &FinderConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            search_timeout: (config.search_timeout_secs > 0)
                .then(|| Duration::from_secs(config.search_timeout_secs)),
            ingest_options: IngestOptions {
                header_scan_rows: (config.header_scan_rows > 0).then_some(config.header_scan_rows),
            },
        }
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = Some(timeout);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 按配置的超时创建一次搜索的中止控制
    pub fn search_control(&self) -> SearchControl {
        match self.search_timeout {
            Some(timeout) => SearchControl::with_timeout(timeout),
            None => SearchControl::unbounded(),
        }
    }

    /// 从文件查找并导出。无命中时不写文件
    pub fn run(
        &self,
        source: &Path,
        request: &FinderRequest,
    ) -> Result<FinderReport, FinderError> {
        self.run_with_control(source, request, &self.search_control())
    }

    /// 同 [`run`](Self::run)，由调用方持有中止控制 (例如客户端断开时取消)
    pub fn run_with_control(
        &self,
        source: &Path,
        request: &FinderRequest,
        control: &SearchControl,
    ) -> Result<FinderReport, FinderError> {
        let table = ingest_path(source, &self.ingest_options)?;
        self.finish(&table, request, control)
    }

    /// 从内存网格查找并导出
    pub fn run_table(
        &self,
        raw: &RawTable,
        request: &FinderRequest,
    ) -> Result<FinderReport, FinderError> {
        let table = ingest(raw, &self.ingest_options)?;
        self.finish(&table, request, &self.search_control())
    }

    fn finish(
        &self,
        table: &IngestedTable,
        request: &FinderRequest,
        control: &SearchControl,
    ) -> Result<FinderReport, FinderError> {
        let report = match find_combinations(table, request, control) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("搜索中止: {}", e);
                return Err(e);
            }
        };

        if !report.found() {
            tracing::info!("目标 {:?} 无匹配组合", request.targets);
            return Ok(FinderReport {
                found: false,
                total_rows: 0,
                output_file: None,
            });
        }

        std::fs::create_dir_all(&self.output_dir).map_err(ExportError::from)?;
        let output_file = self.output_dir.join(output_file_name());
        report.to_table().export_to_csv(&output_file)?;

        Ok(FinderReport {
            found: true,
            total_rows: report.total_rows(),
            output_file: Some(output_file),
        })
    }
}

/// `invoice_combinations_<ddmmYYYY_HHMMSS>_<uuid>.csv`
pub fn output_file_name() -> String {
    format!(
        "invoice_combinations_{}_{}.csv",
        Local::now().format("%d%m%Y_%H%M%S"),
        uuid::Uuid::new_v4().simple()
    )
}
