use crate::error::{FinderError, IngestionError, SearchError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Proses gagal. Coba lagi.")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// 面向用户的提示按错误类型区分，文案使用印尼语
impl From<FinderError> for ApiError {
    fn from(err: FinderError) -> Self {
        match err {
            FinderError::InvalidRequest(_) => {
                Self::bad_request("Target harus berupa angka positif.")
            }
            FinderError::SourceNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "Upload tidak ditemukan.")
            }
            FinderError::Ingestion(e) => Self::bad_request(ingestion_message(&e)),
            FinderError::Search(SearchError::DeadlineExceeded) => Self::new(
                StatusCode::REQUEST_TIMEOUT,
                "Pencarian terlalu lama. Kurangi jumlah maksimal invoice atau perbesar target.",
            ),
            FinderError::Search(SearchError::Cancelled) => Self::internal(),
            FinderError::Export(e) => {
                tracing::error!("结果导出失败: {}", e);
                Self::internal()
            }
        }
    }
}

fn ingestion_message(err: &IngestionError) -> &'static str {
    match err {
        IngestionError::Read { .. } => {
            "Gagal membaca file. Pastikan file .xlsx atau .csv valid dan tidak rusak."
        }
        IngestionError::HeaderNotFound { .. } => {
            "Header tidak ditemukan. Pastikan ada kolom 'Nama Pelanggan'."
        }
        IngestionError::MissingColumns { .. } => {
            "Kolom penting tidak lengkap. Wajib ada: 'Nama Pelanggan', 'No. Faktur', 'Tgl. Faktur', 'Total'."
        }
        IngestionError::EmptyDataset { .. } => {
            "Data kosong setelah dibersihkan. Pastikan kolom Total berisi angka dan tanggal faktur valid."
        }
    }
}
