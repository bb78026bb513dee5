//! 字段清洗：金额、日期、文本

use super::raw::Cell;
use chrono::NaiveDate;

/// 千分位分隔符
pub const THOUSANDS_SEPARATOR: char = ',';
/// 小数点，之后的部分被截断 (金额只保留整数)
pub const DECIMAL_POINT: char = '.';

/// 文本日期的可接受格式，按顺序尝试。斜杠/横杠格式按日在前解析。
///
/// 有意按印尼习惯日在前：`05/01/2024` 是 1 月 5 日，不按美式月在前
/// 读成 5 月 1 日。
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// 清洗金额：去千分位，截断小数，转为整数。无法解析返回 None (而不是 0)
pub fn clean_total(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Number(n) => truncate_f64(*n),
        Cell::Text(s) => parse_total_text(s),
        _ => None,
    }
}

fn parse_total_text(raw: &str) -> Option<i64> {
    let stripped: String = raw.chars().filter(|c| *c != THOUSANDS_SEPARATOR).collect();
    let integral = match stripped.find(DECIMAL_POINT) {
        Some(pos) => &stripped[..pos],
        None => stripped.as_str(),
    };
    let integral = integral.trim();
    if integral.is_empty() {
        return None;
    }

    integral
        .parse::<i64>()
        .ok()
        .or_else(|| integral.parse::<f64>().ok().and_then(truncate_f64))
}

fn truncate_f64(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let t = n.trunc();
    if t < i64::MIN as f64 || t > i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}

/// 清洗日期。原生日期单元格直接取日期部分，纯数字单元格视为无效
pub fn clean_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// 清洗文本字段 (客户名、发票号)。空白视为缺失，其余原样保留
pub fn clean_text(cell: &Cell) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    Some(cell.render())
}
