// 🧱 Fact View - Rendered table structures
// Context groups with their tables, appended into per-category containers.
// Search and sort mutate visibility and row order of this structure only.

use crate::categories::{Category, CategoryRules};
use crate::config::ElementIds;
use crate::facts::Fact;
use crate::grouping::{filter_by_category, group_by_context, GroupedFacts};

/// Fixed table columns
pub const COLUMNS: [&str; 4] = ["Concept", "Value", "Unit Ref", "Decimals"];

// ============================================================================
// ROWS & TABLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRow {
    cells: [String; 4],
    pub hidden: bool,
}

impl FactRow {
    pub fn from_fact(fact: &Fact) -> Self {
        FactRow {
            cells: [
                fact.concept.clone(),
                fact.value.clone(),
                fact.unit_display().to_string(),
                fact.decimals_display().to_string(),
            ],
            hidden: false,
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Full text of the row, cells separated by a space
    pub fn text_content(&self) -> String {
        self.cells.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactTable {
    pub rows: Vec<FactRow>,
}

impl FactTable {
    pub fn from_facts(facts: &[Fact]) -> Self {
        FactTable {
            rows: facts.iter().map(FactRow::from_fact).collect(),
        }
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &FactRow> {
        self.rows.iter().filter(|row| !row.hidden)
    }

    /// Values of one column in current row order
    pub fn column(&self, column: usize) -> Vec<&str> {
        self.rows.iter().filter_map(|row| row.cell(column)).collect()
    }
}

/// Heading plus table for one reporting context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextGroup {
    pub context_ref: String,
    pub table: FactTable,
    pub hidden: bool,
}

impl ContextGroup {
    pub fn heading(&self) -> String {
        format!("Context: {}", self.context_ref)
    }
}

// ============================================================================
// CONTAINERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub category: Category,
    pub groups: Vec<ContextGroup>,
}

impl Container {
    pub fn new(id: &str, category: Category) -> Self {
        Container {
            id: id.to_string(),
            category,
            groups: Vec::new(),
        }
    }

    /// Append one group per context, in iteration order
    pub fn populate(&mut self, grouped: &GroupedFacts) {
        for (context_ref, facts) in grouped.iter() {
            self.groups.push(ContextGroup {
                context_ref: context_ref.to_string(),
                table: FactTable::from_facts(facts),
                hidden: false,
            });
        }
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.table.rows.len()).sum()
    }

    pub fn visible_groups(&self) -> impl Iterator<Item = &ContextGroup> {
        self.groups.iter().filter(|g| !g.hidden)
    }
}

/// The four category containers of a rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactsView {
    pub containers: Vec<Container>,
}

impl FactsView {
    /// Group once, then populate every category container
    pub fn build(facts: &[Fact], rules: &CategoryRules, ids: &ElementIds) -> Self {
        let grouped = group_by_context(facts);

        let containers = Category::ALL
            .into_iter()
            .map(|category| {
                let mut container = Container::new(ids.container(category), category);
                if category == Category::All {
                    container.populate(&grouped);
                } else {
                    container.populate(&filter_by_category(&grouped, rules.predicate(category)));
                }
                tracing::debug!(
                    container = %container.id,
                    groups = container.groups.len(),
                    rows = container.row_count(),
                    "Populated container"
                );
                container
            })
            .collect();

        FactsView { containers }
    }

    pub fn container(&self, category: Category) -> Option<&Container> {
        self.containers.iter().find(|c| c.category == category)
    }

    pub fn container_mut(&mut self, category: Category) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.category == category)
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut ContextGroup> {
        self.containers.iter_mut().flat_map(|c| c.groups.iter_mut())
    }
}

// ============================================================================
// TESTS
// ============================================================================
