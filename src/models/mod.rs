pub mod invoice;
pub mod result;
pub mod target;

pub use invoice::{CustomerGroup, InvoiceRecord};
pub use result::{MatchResult, MatchedInvoice};
pub use target::{
    parse_targets, Target, DEFAULT_MAX_INVOICES, DEFAULT_TOLERANCE, MAX_INVOICES_CAP,
};
