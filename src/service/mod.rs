pub mod control;
pub mod finder;
pub mod search;

pub use control::SearchControl;
pub use finder::{
    find_combinations, output_file_name, FinderReport, FinderRequest, InvoiceFinder, MatchReport,
};
pub use search::{group_by_customer, search, search_with_control};
