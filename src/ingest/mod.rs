//! 发票表读取与清洗
//!
//! 两阶段：先在无类型网格上扫描表头行 (`header`)，再以该行为表头
//! 逐行解析并清洗四个必需列 (`clean`)。

pub mod clean;
pub mod header;
pub mod raw;

pub use clean::{clean_date, clean_text, clean_total};
pub use header::{
    locate_header, resolve_columns, ColumnMap, ColumnRole, ResolvedColumn, HEADER_MARKER,
};
pub use raw::{read_table, Cell, RawTable, SourceFormat};

use crate::error::IngestionError;
use crate::models::InvoiceRecord;
use std::path::Path;

/// 读取选项
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// 表头扫描行数上限，None 表示全表
    pub header_scan_rows: Option<usize>,
}

/// 清洗结果
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub records: Vec<InvoiceRecord>,
    pub columns: ColumnMap,
    pub header_row: usize,
    pub dropped_rows: usize,
}

/// 从文件读取并清洗
pub fn ingest_path(
    path: &Path,
    options: &IngestOptions,
) -> Result<IngestedTable, IngestionError> {
    let raw = read_table(path)?;
    tracing::debug!("读取 {:?}: {} 行原始数据", path, raw.row_count());
    ingest(&raw, options)
}

/// 从原始网格清洗出发票记录
pub fn ingest(raw: &RawTable, options: &IngestOptions) -> Result<IngestedTable, IngestionError> {
    let header_row = locate_header(raw, options.header_scan_rows)?;
    let labels = header::header_labels(&raw.rows()[header_row]);
    let columns = resolve_columns(&labels)?;

    tracing::info!(
        "表头位于第 {} 行, 列: customer={:?} invoice={:?} date={:?} total={:?}",
        header_row + 1,
        columns.customer.label,
        columns.invoice_number.label,
        columns.invoice_date.label,
        columns.total.label
    );

    let data_rows = &raw.rows()[header_row + 1..];
    let mut records = Vec::with_capacity(data_rows.len());
    let mut dropped_rows = 0;

    for row in data_rows {
        match clean_row(row, &columns) {
            Some(record) => records.push(record),
            None => dropped_rows += 1,
        }
    }

    if records.is_empty() {
        tracing::warn!("清洗后无可用数据, 丢弃 {} 行", dropped_rows);
        return Err(IngestionError::EmptyDataset { dropped: dropped_rows });
    }

    tracing::info!("清洗完成: 保留 {} 行, 丢弃 {} 行", records.len(), dropped_rows);

    Ok(IngestedTable {
        records,
        columns,
        header_row,
        dropped_rows,
    })
}

/// 任一字段缺失/无效，或金额非正，整行丢弃
fn clean_row(row: &[Cell], columns: &ColumnMap) -> Option<InvoiceRecord> {
    let [customer, number, date, total] = columns.project(row);

    let customer = clean_text(customer?)?;
    let invoice_number = clean_text(number?)?;
    let invoice_date = clean_date(date?)?;
    let total = clean_total(total?)?;

    if total <= 0 {
        return None;
    }

    Some(InvoiceRecord {
        customer,
        invoice_number,
        invoice_date,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header() -> Vec<&'static str> {
        vec!["Nama Pelanggan", "No. Faktur", "Tgl. Faktur", "Total"]
    }

    #[test]
    fn header_after_metadata_with_annotated_total() {
        let table = RawTable::from_strings(vec![
            vec!["PT Sumber Data"],
            vec!["Laporan Penjualan per Faktur"],
            vec!["Dicetak: 01/02/2024"],
            vec!["", "", "", "", ""],
            vec!["No", "Nama Pelanggan", "No. Faktur", "Tgl. Faktur", "Total (IDR)"],
            vec!["1", "PT A", "F-001", "2024-01-10", "1,250,000.00"],
        ]);

        let ingested = ingest(&table, &IngestOptions::default()).unwrap();
        assert_eq!(ingested.header_row, 4);
        assert_eq!(ingested.columns.total.label, "Total (IDR)");
        assert_eq!(
            ingested.records,
            vec![InvoiceRecord::new(
                "PT A",
                "F-001",
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                1_250_000
            )]
        );
    }

    #[test]
    fn invalid_and_non_positive_rows_are_dropped() {
        let table = RawTable::from_strings(vec![
            header(),
            vec!["PT A", "F-1", "2024-01-01", "1,234.99"],
            vec!["PT A", "F-2", "2024-01-02", "abc"],
            vec!["PT A", "F-3", "bukan tanggal", "100"],
            vec!["PT A", "F-4", "2024-01-04", "0"],
            vec!["PT A", "F-5", "2024-01-05", "-50"],
            vec!["", "F-6", "2024-01-06", "100"],
            vec!["PT B", "F-7", "2024-01-07"],
        ]);

        let ingested = ingest(&table, &IngestOptions::default()).unwrap();
        assert_eq!(ingested.records.len(), 1);
        assert_eq!(ingested.records[0].total, 1234);
        assert_eq!(ingested.dropped_rows, 6);
    }

    #[test]
    fn no_surviving_rows_is_empty_dataset() {
        let table = RawTable::from_strings(vec![
            header(),
            vec!["PT A", "F-1", "2024-01-01", "0"],
            vec!["PT A", "F-2", "xx", "100"],
        ]);

        let err = ingest(&table, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::EmptyDataset { dropped: 2 }));
    }

    #[test]
    fn missing_header_is_reported() {
        let table = RawTable::from_strings(vec![vec!["Customer", "Invoice", "Date", "Amount"]]);
        let err = ingest(&table, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::HeaderNotFound { .. }));
    }

    #[test]
    fn missing_columns_are_reported() {
        let table = RawTable::from_strings(vec![vec!["Nama Pelanggan", "No. Faktur", "Total"]]);
        let err = ingest(&table, &IngestOptions::default()).unwrap_err();
        match err {
            IngestionError::MissingColumns { missing } => {
                assert_eq!(missing, vec![header::INVOICE_DATE_MARKER])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
