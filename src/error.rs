use std::path::PathBuf;
use thiserror::Error;

/// 读取/清洗阶段错误。任何一种都会中止整个调用，不产生部分结果
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 源文件无法解析为表格
    #[error("failed to read table from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// 没有任何一行包含客户名表头标记
    #[error("header row not found: no row contains {marker:?} (scanned {scanned} rows)")]
    HeaderNotFound { marker: &'static str, scanned: usize },

    /// 四个必需列未能全部解析
    #[error("required columns missing: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },

    /// 结构正常，但清洗后没有可用数据行
    #[error("no usable rows after cleaning ({dropped} rows dropped)")]
    EmptyDataset { dropped: usize },
}

impl IngestionError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// 搜索被调用方中止
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search cancelled")]
    Cancelled,

    #[error("search deadline exceeded")]
    DeadlineExceeded,
}

/// 结果表导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 查找流程的统一错误
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("source not found: {0}")]
    SourceNotFound(String),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
