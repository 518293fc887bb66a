// 🗂️ Grouping - Facts by reporting context
// Stable grouping plus per-category filtering of the groups

use crate::facts::Fact;
use std::collections::HashMap;

/// Ordered mapping contextRef → facts
///
/// Contexts iterate in first-seen order; facts keep their input order within
/// each context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedFacts {
    groups: Vec<(String, Vec<Fact>)>,
    index: HashMap<String, usize>,
}

impl GroupedFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fact to its context, opening the context if unseen
    pub fn push(&mut self, fact: Fact) {
        match self.index.get(&fact.context_ref) {
            Some(&i) => self.groups[i].1.push(fact),
            None => {
                self.index.insert(fact.context_ref.clone(), self.groups.len());
                self.groups.push((fact.context_ref.clone(), vec![fact]));
            }
        }
    }

    pub fn get(&self, context_ref: &str) -> Option<&[Fact]> {
        self.index
            .get(context_ref)
            .map(|&i| self.groups[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Fact])> {
        self.groups
            .iter()
            .map(|(context_ref, facts)| (context_ref.as_str(), facts.as_slice()))
    }

    pub fn contexts(&self) -> Vec<&str> {
        self.groups.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// Number of contexts
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of facts across all contexts
    pub fn fact_count(&self) -> usize {
        self.groups.iter().map(|(_, facts)| facts.len()).sum()
    }
}

impl FromIterator<Fact> for GroupedFacts {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut grouped = GroupedFacts::new();
        for fact in iter {
            grouped.push(fact);
        }
        grouped
    }
}

/// Group facts by context reference
pub fn group_by_context(facts: &[Fact]) -> GroupedFacts {
    facts.iter().cloned().collect()
}

/// Keep only facts whose concept satisfies the predicate
///
/// Contexts left without facts are dropped; surviving contexts keep their
/// relative order.
pub fn filter_by_category<F>(grouped: &GroupedFacts, predicate: F) -> GroupedFacts
where
    F: Fn(&str) -> bool,
{
    let mut filtered = GroupedFacts::new();
    for (_, facts) in grouped.iter() {
        for fact in facts.iter().filter(|f| predicate(&f.concept)) {
            filtered.push(fact.clone());
        }
    }
    filtered
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{Category, CategoryRules};

    fn sample_facts() -> Vec<Fact> {
        vec![
            Fact::new("AssetsCurrent", "100", "FY2023"),
            Fact::new("Revenue", "500", "FY2022"),
            Fact::new("OperatingIncomeLoss", "80", "FY2023"),
            Fact::new("EntityRegistrantName", "Apple Inc.", "DEI"),
            Fact::new("Liabilities", "40", "FY2022"),
        ]
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let grouped = group_by_context(&sample_facts());
        assert_eq!(grouped.contexts(), vec!["FY2023", "FY2022", "DEI"]);

        let fy2023 = grouped.get("FY2023").unwrap();
        assert_eq!(fy2023[0].concept, "AssetsCurrent");
        assert_eq!(fy2023[1].concept, "OperatingIncomeLoss");
    }

    #[test]
    fn test_group_preserves_fact_count() {
        let facts = sample_facts();
        let grouped = group_by_context(&facts);
        assert_eq!(grouped.fact_count(), facts.len());
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn test_group_empty_input() {
        let grouped = group_by_context(&[]);
        assert!(grouped.is_empty());
        assert_eq!(grouped.fact_count(), 0);
    }

    #[test]
    fn test_numeric_context_keeps_insertion_order() {
        let facts = vec![
            Fact::new("Assets", "1", "c-b"),
            Fact::new("Assets", "2", "2023"),
        ];
        let grouped = group_by_context(&facts);
        assert_eq!(grouped.contexts(), vec!["c-b", "2023"]);
    }

    #[test]
    fn test_filter_drops_empty_contexts() {
        let rules = CategoryRules::default();
        let grouped = group_by_context(&sample_facts());

        let balance = filter_by_category(&grouped, rules.predicate(Category::BalanceSheet));
        assert_eq!(balance.contexts(), vec!["FY2023", "FY2022"]);
        assert_eq!(balance.get("FY2023").unwrap().len(), 1);
        assert_eq!(balance.get("FY2022").unwrap()[0].concept, "Liabilities");
        assert!(balance.get("DEI").is_none());
    }

    #[test]
    fn test_filter_non_exclusive() {
        let rules = CategoryRules::default();
        let grouped = group_by_context(&sample_facts());

        let income = filter_by_category(&grouped, rules.predicate(Category::IncomeStatement));
        let cash = filter_by_category(&grouped, rules.predicate(Category::CashFlow));

        assert_eq!(income.fact_count(), 2);
        assert_eq!(cash.fact_count(), 1);
        assert_eq!(cash.get("FY2023").unwrap()[0].concept, "OperatingIncomeLoss");
    }

    #[test]
    fn test_filter_all_is_identity() {
        let rules = CategoryRules::default();
        let grouped = group_by_context(&sample_facts());
        let all = filter_by_category(&grouped, rules.predicate(Category::All));
        assert_eq!(all, grouped);
    }
}
