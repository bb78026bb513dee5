use serde::{Deserialize, Serialize};

/// 默认容差 (金额单位)
pub const DEFAULT_TOLERANCE: i64 = 100;
/// 默认单个组合最多发票数
pub const DEFAULT_MAX_INVOICES: usize = 5;
/// 组合大小上限，穷举成本的唯一保护
pub const MAX_INVOICES_CAP: usize = 20;

/// 目标金额 + 容差 + 组合大小上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub amount: i64,
    pub tolerance: i64,
    pub max_size: usize,
}

impl Target {
    /// 容差截断到 >= 0，组合大小截断到 [1, MAX_INVOICES_CAP]
    pub fn new(amount: i64, tolerance: i64, max_size: usize) -> Self {
        Self {
            amount,
            tolerance: tolerance.max(0),
            max_size: max_size.clamp(1, MAX_INVOICES_CAP),
        }
    }

    pub fn with_defaults(amount: i64) -> Self {
        Self::new(amount, DEFAULT_TOLERANCE, DEFAULT_MAX_INVOICES)
    }

    /// 组合总额是否落在容差内
    pub fn accepts(&self, sum: i64) -> bool {
        sum.abs_diff(self.amount) <= self.tolerance.unsigned_abs()
    }

    /// 可接受的最大组合总额
    pub fn ceiling(&self) -> i64 {
        self.amount.saturating_add(self.tolerance)
    }
}

/// 解析逗号分隔的目标金额列表。
///
/// 每段只保留数字字符，所以 `"Rp 1.000.000"` 解析为 `1000000`；
/// 空段和非正数被跳过。
pub fn parse_targets(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| {
            let digits: String = part.trim().chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                return None;
            }
            digits.parse::<i64>().ok().filter(|v| *v > 0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_targets_keeps_digits_only() {
        assert_eq!(
            parse_targets("1.000.000, Rp 250.000,abc, 0 ,42"),
            vec![1_000_000, 250_000, 42]
        );
        assert!(parse_targets("").is_empty());
        assert!(parse_targets(" , ,").is_empty());
    }

    #[test]
    fn target_new_clamps_inputs() {
        let t = Target::new(1000, -5, 0);
        assert_eq!(t.tolerance, 0);
        assert_eq!(t.max_size, 1);

        let t = Target::new(1000, 10, 99);
        assert_eq!(t.max_size, MAX_INVOICES_CAP);
    }

    #[test]
    fn accepts_is_inclusive_on_both_sides() {
        let t = Target::new(1000, 50, 3);
        assert!(t.accepts(950));
        assert!(t.accepts(1050));
        assert!(!t.accepts(949));
        assert!(!t.accepts(1051));
        assert_eq!(t.ceiling(), 1050);
    }
}
