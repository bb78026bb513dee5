//! 原始表格：无表头假设的单元格网格，以及 CSV / 工作簿读取

use crate::error::IngestionError;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

/// 未定型的单元格
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// 空单元格或全空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 单元格的文本形式。整数值的浮点数不带小数部分
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    n.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

/// 行 × 列的原始网格，只在表头识别期间存在
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// 从字符串网格构造，空字符串视为空单元格
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Cell::from(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 读取无表头 CSV，允许行长不一致
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from).collect());
        }
        Ok(Self { rows })
    }
}

/// 源文件格式，按扩展名判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            _ => None,
        }
    }
}

/// 读取源文件为原始网格 (第一阶段：不假设表头)
pub fn read_table(path: &Path) -> Result<RawTable, IngestionError> {
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Csv) => {
            let file = std::fs::File::open(path).map_err(|e| IngestionError::read(path, e))?;
            RawTable::from_csv_reader(file).map_err(|e| IngestionError::read(path, e))
        }
        Some(SourceFormat::Workbook) => read_workbook(path),
        None => Err(IngestionError::read(path, "unsupported file extension")),
    }
}

#[cfg(feature = "excel")]
fn read_workbook(path: &Path) -> Result<RawTable, IngestionError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path).map_err(|e| IngestionError::read(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestionError::read(path, "workbook has no sheets"))?
        .map_err(|e| IngestionError::read(path, e))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => Cell::Empty,
                    Data::String(s) => Cell::from(s.as_str()),
                    Data::Int(i) => Cell::Number(*i as f64),
                    Data::Float(f) => Cell::Number(*f),
                    Data::Bool(b) => Cell::Bool(*b),
                    Data::DateTime(dt) => dt
                        .as_datetime()
                        .map(Cell::DateTime)
                        .unwrap_or(Cell::Empty),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
                    #[allow(unreachable_patterns)]
                    _ => Cell::Empty,
                })
                .collect()
        })
        .collect();

    Ok(RawTable::new(rows))
}

#[cfg(not(feature = "excel"))]
fn read_workbook(path: &Path) -> Result<RawTable, IngestionError> {
    Err(IngestionError::read(
        path,
        "workbook support disabled (build with feature `excel`)",
    ))
}
