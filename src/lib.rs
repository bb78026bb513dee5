pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
pub mod service;

pub use config::AppConfig;
pub use error::{ExportError, FinderError, IngestionError, SearchError};
pub use ingest::{ingest, ingest_path, IngestOptions, IngestedTable, RawTable};
pub use models::{InvoiceRecord, MatchResult, Target};
pub use service::{search, FinderRequest, InvoiceFinder, SearchControl};
