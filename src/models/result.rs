use super::InvoiceRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 组合中的一张发票
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedInvoice {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub total: i64,
}

impl From<&InvoiceRecord> for MatchedInvoice {
    fn from(record: &InvoiceRecord) -> Self {
        Self {
            invoice_number: record.invoice_number.clone(),
            invoice_date: record.invoice_date,
            total: record.total,
        }
    }
}

/// 一个满足目标的组合 (MatchResult)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub target: i64,
    pub customer: String,
    pub invoices: Vec<MatchedInvoice>, // 源表顺序
    pub combination_total: i64,
}

impl MatchResult {
    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }
}
