//! 表头识别与列映射
//!
//! 会计软件导出的文件前面常带若干行元数据，表头文字也会附带注释
//! (例如 `Total (IDR)`)，所以表头行按标记串扫描定位，列按子串匹配解析。

use super::raw::{Cell, RawTable};
use crate::error::IngestionError;
use serde::Serialize;

/// 表头行标记：客户名列的表头文字
pub const HEADER_MARKER: &str = "Nama Pelanggan";

pub const CUSTOMER_MARKER: &str = "Nama Pelanggan";
pub const INVOICE_NUMBER_MARKER: &str = "No. Faktur";
pub const INVOICE_DATE_MARKER: &str = "Tgl. Faktur";
pub const TOTAL_MARKER: &str = "Total";

/// 四个逻辑列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnRole {
    CustomerName,
    InvoiceNumber,
    InvoiceDate,
    Total,
}

impl ColumnRole {
    /// 匹配优先级顺序：一列只归属第一个命中的角色
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::CustomerName,
        ColumnRole::InvoiceNumber,
        ColumnRole::InvoiceDate,
        ColumnRole::Total,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            ColumnRole::CustomerName => CUSTOMER_MARKER,
            ColumnRole::InvoiceNumber => INVOICE_NUMBER_MARKER,
            ColumnRole::InvoiceDate => INVOICE_DATE_MARKER,
            ColumnRole::Total => TOTAL_MARKER,
        }
    }

    /// 表头文字是否属于该角色 (子串匹配)
    pub fn matches(self, label: &str) -> bool {
        label.contains(self.marker())
    }

    /// 按优先级确定表头所属角色
    pub fn classify(label: &str) -> Option<ColumnRole> {
        Self::ALL.into_iter().find(|role| role.matches(label))
    }
}

/// 已解析的物理列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub index: usize,
    pub label: String,
}

/// 逻辑角色 -> 物理列。构建后不可变，四列互不相同
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub customer: ResolvedColumn,
    pub invoice_number: ResolvedColumn,
    pub invoice_date: ResolvedColumn,
    pub total: ResolvedColumn,
}

impl ColumnMap {
    pub fn get(&self, role: ColumnRole) -> &ResolvedColumn {
        match role {
            ColumnRole::CustomerName => &self.customer,
            ColumnRole::InvoiceNumber => &self.invoice_number,
            ColumnRole::InvoiceDate => &self.invoice_date,
            ColumnRole::Total => &self.total,
        }
    }

    /// 按 ColumnRole::ALL 顺序取出四个单元格
    pub fn project<'r>(&self, row: &'r [Cell]) -> [Option<&'r Cell>; 4] {
        ColumnRole::ALL.map(|role| row.get(self.get(role).index))
    }
}

/// 扫描表头行。`scan_limit` 为 None 时扫描全表
pub fn locate_header(
    table: &RawTable,
    scan_limit: Option<usize>,
) -> Result<usize, IngestionError> {
    let limit = scan_limit.unwrap_or(usize::MAX);
    let mut scanned = 0;

    for (idx, row) in table.rows().iter().take(limit).enumerate() {
        scanned += 1;
        let joined = row.iter().map(Cell::render).collect::<Vec<_>>().join(" ");
        if joined.contains(HEADER_MARKER) {
            return Ok(idx);
        }
    }

    Err(IngestionError::HeaderNotFound {
        marker: HEADER_MARKER,
        scanned,
    })
}

/// 表头文字，去除首尾空白
pub fn header_labels(row: &[Cell]) -> Vec<String> {
    row.iter().map(|c| c.render().trim().to_string()).collect()
}

/// 按子串解析四个角色。同一角色命中多列时取最右一列
pub fn resolve_columns(labels: &[String]) -> Result<ColumnMap, IngestionError> {
    let mut slots: [Option<ResolvedColumn>; 4] = Default::default();

    for (index, label) in labels.iter().enumerate() {
        if let Some(role) = ColumnRole::classify(label) {
            slots[role as usize] = Some(ResolvedColumn {
                index,
                label: label.clone(),
            });
        }
    }

    match slots {
        [Some(customer), Some(invoice_number), Some(invoice_date), Some(total)] => Ok(ColumnMap {
            customer,
            invoice_number,
            invoice_date,
            total,
        }),
        _ => {
            let missing = ColumnRole::ALL
                .iter()
                .zip(slots.iter())
                .filter(|(_, slot)| slot.is_none())
                .map(|(role, _)| role.marker())
                .collect();
            Err(IngestionError::MissingColumns { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn locate_header_skips_metadata_rows() {
        let table = RawTable::from_strings(vec![
            vec!["PT Contoh Makmur"],
            vec!["Laporan Faktur Penjualan"],
            vec!["Periode: Januari 2024"],
            vec![""],
            vec!["No", " Nama Pelanggan ", "No. Faktur", "Tgl. Faktur", "Total"],
        ]);
        assert_eq!(locate_header(&table, None).unwrap(), 4);
    }

    #[test]
    fn locate_header_respects_scan_limit() {
        let table = RawTable::from_strings(vec![
            vec!["meta"],
            vec!["meta"],
            vec!["Nama Pelanggan"],
        ]);
        let err = locate_header(&table, Some(2)).unwrap_err();
        assert!(matches!(err, IngestionError::HeaderNotFound { scanned: 2, .. }));
    }

    #[test]
    fn resolve_columns_by_substring() {
        let map = resolve_columns(&labels(&[
            "No",
            "Nama Pelanggan",
            "No. Faktur Pajak",
            "Tgl. Faktur",
            "Keterangan",
            "Total (IDR)",
        ]))
        .unwrap();
        assert_eq!(map.customer.index, 1);
        assert_eq!(map.invoice_number.index, 2);
        assert_eq!(map.invoice_date.index, 3);
        assert_eq!(map.total.index, 5);
        assert_eq!(map.total.label, "Total (IDR)");
    }

    #[test]
    fn one_column_never_serves_two_roles() {
        // "Nama Pelanggan Total" 只归属客户列
        let err = resolve_columns(&labels(&["Nama Pelanggan Total", "No. Faktur", "Tgl. Faktur"]))
            .unwrap_err();
        match err {
            IngestionError::MissingColumns { missing } => assert_eq!(missing, vec![TOTAL_MARKER]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn later_column_wins_for_same_role() {
        let map = resolve_columns(&labels(&[
            "Nama Pelanggan",
            "No. Faktur",
            "Tgl. Faktur",
            "Sub Total",
            "Total",
        ]))
        .unwrap();
        assert_eq!(map.total.index, 4);
    }
}
