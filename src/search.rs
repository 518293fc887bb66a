// 🔍 Search Filter - Live substring filtering across all containers

use crate::view::FactsView;

/// Counts after a search pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub visible_rows: usize,
    pub visible_groups: usize,
}

/// Show rows whose text contains the query, case-insensitively
///
/// Recomputed from scratch over every group of every container. A group stays
/// visible while at least one of its rows is visible, so an empty query shows
/// everything.
pub fn apply_search(view: &mut FactsView, query: &str) -> SearchOutcome {
    let needle = query.to_lowercase();
    let mut outcome = SearchOutcome::default();

    for group in view.groups_mut() {
        let mut group_visible = false;
        for row in group.table.rows.iter_mut() {
            let visible = row.text_content().to_lowercase().contains(&needle);
            row.hidden = !visible;
            if visible {
                group_visible = true;
                outcome.visible_rows += 1;
            }
        }
        group.hidden = !group_visible;
        if group_visible {
            outcome.visible_groups += 1;
        }
    }

    tracing::trace!(query, rows = outcome.visible_rows, "Search applied");
    outcome
}
