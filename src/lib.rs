// XBRL Viewer - Core Library
// Exposes all modules for use in the CLI, the terminal viewer, and tests

pub mod facts;       // Fact model + embedded payload loader
pub mod xbrl;        // Raw XBRL document → facts
pub mod source;      // Input detection (document vs rendered page)
pub mod categories;  // Keyword rules per financial statement
pub mod grouping;    // Facts by context
pub mod view;        // Rendered containers, groups and tables
pub mod render;      // Container markup
pub mod search;      // Live search filter
pub mod sort;        // Column sorter
pub mod metrics;     // Ratios, European metrics, sector comparison
pub mod report;      // Self-contained HTML page
pub mod config;      // Viewer configuration

// Re-export commonly used types
pub use facts::{
    Fact, parse_facts, extract_embedded_payload, load_embedded_facts,
    DEFAULT_DATA_ELEMENT_ID, NOT_AVAILABLE,
};
pub use xbrl::{XbrlDocument, SectorAverages, load_xbrl_document};
pub use source::{SourceKind, LoadedFacts, load_source};
pub use categories::{Category, CategoryRule, CategoryRules};
pub use grouping::{GroupedFacts, group_by_context, filter_by_category};
pub use view::{FactsView, Container, ContextGroup, FactTable, FactRow, COLUMNS};
pub use render::{render_container, render_table, html_escape};
pub use search::{apply_search, SearchOutcome};
pub use sort::natural_cmp;
pub use metrics::{
    FinancialRatios, EuropeanMetrics, Comparison, ComparisonRow,
    fact_value, compare_with_sector, standard_comparisons,
};
pub use config::{ViewerConfig, ElementIds};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
