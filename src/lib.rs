// Soil ERP - Core Library
// Receivable aging and project aggregation, shared by the CLI, the API server and tests

pub mod config;
pub mod receivable;
pub mod aging;
pub mod stats;
pub mod contract;
pub mod projects;
pub mod sorting;
pub mod import;

// Re-export commonly used types
pub use config::{load_config, load_config_with_fallback, Config};
pub use receivable::{ClassifiedReceivable, ClientType, OverdueLevel, PaymentStatus, ReceivableRecord};
pub use aging::{
    classify_overdue_days, classify_overdue_level, classify_payment_status,
    AgingEngine, StatusInput,
};
pub use stats::ReceivableStats;
pub use contract::{AmendmentMarker, ContractRecord};
pub use projects::{
    group_by_project, summarize_project, summarize_projects,
    PortfolioTotals, ProjectGroups, ProjectSummary,
};
pub use sorting::{
    parse_sort_key, sort_rows, ProjectColumn, ReceivableColumn, SortDirection, SortState, SortValue, Sortable,
};
pub use import::{load_contracts_csv, load_receivables_csv, read_contracts, read_receivables};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
