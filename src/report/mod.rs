//! 结果表渲染与导出

pub mod format;
pub mod table;

pub use format::{
    format_currency, format_date, CURRENCY_PREFIX, DATE_FORMAT, LIST_DELIMITER,
};
pub use table::{ResultTable, COLUMN_TARGET, RESULT_COLUMNS};
