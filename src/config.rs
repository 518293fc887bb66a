// ⚙️ Viewer Configuration
// Page element ids, category rules location and output defaults

use crate::categories::{Category, CategoryRules};
use crate::facts::DEFAULT_DATA_ELEMENT_ID;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file
pub const CONFIG_ENV_VAR: &str = "XBRL_VIEWER_CONFIG";

/// Ids of the page elements the viewer reads from and writes into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    /// Element carrying the embedded facts JSON
    pub data: String,

    /// Text input driving the search filter
    pub search_input: String,

    /// Wrapper around the four containers; its headers are sortable
    pub tables: String,

    pub all_facts: String,
    pub balance_sheet: String,
    pub income_statement: String,
    pub cash_flow: String,
}

impl ElementIds {
    pub fn container(&self, category: Category) -> &str {
        match category {
            Category::All => &self.all_facts,
            Category::BalanceSheet => &self.balance_sheet,
            Category::IncomeStatement => &self.income_statement,
            Category::CashFlow => &self.cash_flow,
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            data: DEFAULT_DATA_ELEMENT_ID.to_string(),
            search_input: "factsSearch".to_string(),
            tables: "factsTables".to_string(),
            all_facts: "all-facts".to_string(),
            balance_sheet: "balance-sheet".to_string(),
            income_statement: "income-statement".to_string(),
            cash_flow: "cash-flow".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub element_ids: ElementIds,

    /// JSON file of category rules; built-in keywords when unset
    pub rules_path: Option<PathBuf>,

    /// Where `render` writes when no output is given
    pub output_path: PathBuf,

    /// Page title of the generated report
    pub title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            element_ids: ElementIds::default(),
            rules_path: None,
            output_path: PathBuf::from("xbrl_report.html"),
            title: "XBRL Data Display".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Explicit path, else `XBRL_VIEWER_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading viewer config");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn category_rules(&self) -> Result<CategoryRules> {
        match &self.rules_path {
            Some(path) => CategoryRules::from_file(path),
            None => Ok(CategoryRules::default()),
        }
    }
}
