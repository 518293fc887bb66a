// 🏷️ Category Rules - Rules as Data
// Keyword rules that bucket concepts into financial statement views

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Every fact, no filtering
    All,
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [
        Category::All,
        Category::BalanceSheet,
        Category::IncomeStatement,
        Category::CashFlow,
    ];

    /// Human-readable name for display
    pub fn title(&self) -> &'static str {
        match self {
            Category::All => "All Facts",
            Category::BalanceSheet => "Balance Sheet",
            Category::IncomeStatement => "Income Statement",
            Category::CashFlow => "Cash Flow",
        }
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,

    /// Case-sensitive substrings; any one of them is enough
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        CategoryRule {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Check if any keyword occurs in the concept name
    pub fn matches(&self, concept: &str) -> bool {
        self.keywords.iter().any(|keyword| concept.contains(keyword.as_str()))
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Ordered list of (category, keyword-set) pairs
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    /// Create an empty rule set (only `All` matches anything)
    pub fn empty() -> Self {
        CategoryRules { rules: Vec::new() }
    }

    /// Load rules from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read category rules file: {:?}", path.as_ref()))?;

        let rules: Vec<CategoryRule> = serde_json::from_str(&content)
            .context("Failed to parse category rules JSON")?;

        tracing::debug!(count = rules.len(), "Loaded category rules");
        Ok(CategoryRules::from_rules(rules))
    }

    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        CategoryRules { rules }
    }

    pub fn add_rule(&mut self, rule: CategoryRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Does the concept belong to the category?
    ///
    /// `All` always matches. A category may have several rules; any of them
    /// matching is enough.
    pub fn matches(&self, category: Category, concept: &str) -> bool {
        if category == Category::All {
            return true;
        }
        self.rules
            .iter()
            .filter(|rule| rule.category == category)
            .any(|rule| rule.matches(concept))
    }

    /// Every category the concept belongs to, `All` first
    pub fn categories_for(&self, concept: &str) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.matches(*category, concept))
            .collect()
    }

    /// Predicate over concept names for one category
    pub fn predicate(&self, category: Category) -> impl Fn(&str) -> bool + '_ {
        move |concept: &str| self.matches(category, concept)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        CategoryRules::from_rules(vec![
            CategoryRule::new(
                Category::BalanceSheet,
                &["Assets", "Liabilities", "Equity", "Inventory", "Receivables"],
            ),
            CategoryRule::new(
                Category::IncomeStatement,
                &["Revenue", "Expenses", "Income", "Profit", "Loss"],
            ),
            CategoryRule::new(
                Category::CashFlow,
                &["CashFlow", "Operating", "Investing", "Financing"],
            ),
        ])
    }
}

// ============================================================================
// TESTS
// ============================================================================
