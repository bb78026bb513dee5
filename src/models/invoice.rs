use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 清洗后的发票行 (InvoiceRecord)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub customer: String,
    pub invoice_number: String, // 不透明编号，原样保留
    pub invoice_date: NaiveDate,
    pub total: i64, // 整数金额，恒 > 0
}

impl InvoiceRecord {
    pub fn new(
        customer: impl Into<String>,
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        total: i64,
    ) -> Self {
        Self {
            customer: customer.into(),
            invoice_number: invoice_number.into(),
            invoice_date,
            total,
        }
    }
}

/// 同一客户的全部发票，保持源表顺序。组合永远不跨组
#[derive(Debug, Clone)]
pub struct CustomerGroup<'a> {
    pub customer: &'a str,
    pub invoices: Vec<&'a InvoiceRecord>,
}

impl<'a> CustomerGroup<'a> {
    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}
