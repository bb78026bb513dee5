use chrono::NaiveDate;

/// 多张发票字段之间的分隔符
pub const LIST_DELIMITER: &str = ", ";
/// 输出日期格式 DD/MM/YYYY
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// 货币前缀
pub const CURRENCY_PREFIX: &str = "Rp";

/// `Rp1,234,567`。金额已是整数，不做四舍五入
pub fn format_currency(amount: i64) -> String {
    format!("{}{}", CURRENCY_PREFIX, group_thousands(amount))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 千分位分组，负号保留在最前
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}
