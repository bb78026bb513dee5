use super::format::{format_currency, format_date, join_list};
use crate::error::ExportError;
use crate::models::MatchResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const COLUMN_TARGET: &str = "Target";
pub const RESULT_COLUMNS: [&str; 6] = [
    "Customer",
    "Invoice Count",
    "Invoice Numbers",
    "Invoice Dates",
    "Invoice Totals",
    "Combination Total",
];

/// 渲染后的结果表。多目标时首列为 Target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn from_results(results: &[MatchResult], include_target: bool) -> Self {
        let mut headers: Vec<String> = Vec::with_capacity(RESULT_COLUMNS.len() + 1);
        if include_target {
            headers.push(COLUMN_TARGET.to_string());
        }
        headers.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));

        let rows = results
            .iter()
            .map(|r| render_row(r, include_target))
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 导出到 CSV 文件
    pub fn export_to_csv(&self, output_path: &Path) -> Result<(), ExportError> {
        let file = std::fs::File::create(output_path)?;
        self.write_csv(file)?;
        tracing::info!("结果已导出: {:?}, {} 行", output_path, self.rows.len());
        Ok(())
    }
}

fn render_row(result: &MatchResult, include_target: bool) -> Vec<String> {
    let mut row = Vec::with_capacity(RESULT_COLUMNS.len() + 1);
    if include_target {
        row.push(format_currency(result.target));
    }
    row.push(result.customer.clone());
    row.push(result.invoice_count().to_string());
    row.push(join_list(result.invoices.iter().map(|i| i.invoice_number.as_str())));
    row.push(join_list(result.invoices.iter().map(|i| format_date(i.invoice_date))));
    row.push(join_list(result.invoices.iter().map(|i| format_currency(i.total))));
    row.push(format_currency(result.combination_total));
    row
}
