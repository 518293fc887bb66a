// 📑 HTML Report - Self-contained page
// Category tabs, live search, sortable headers, metric comparisons and the
// embedded facts payload, all in one file with inline CSS/JS.

use crate::categories::Category;
use crate::config::ElementIds;
use crate::facts::Fact;
use crate::metrics::Comparison;
use crate::render::{html_escape, render_container};
use crate::view::FactsView;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// Everything a report page is built from
pub struct ReportData<'a> {
    pub title: &'a str,
    pub facts: &'a [Fact],
    pub view: &'a FactsView,
    pub comparisons: &'a [Comparison],
    pub ids: &'a ElementIds,
    pub generated_at: DateTime<Utc>,
}

/// JSON safe to place inside a `<script>` element
///
/// Every `<` becomes `\u003c`, so neither `</script>` nor `<!--` can appear.
pub fn embed_json(facts: &[Fact]) -> Result<String> {
    let json = serde_json::to_string(facts).context("Failed to serialize facts")?;
    Ok(json.replace('<', "\\u003c"))
}

/// Generate the full page
pub fn generate(data: &ReportData) -> Result<String> {
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{css}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n<p class=\"generated\">Generated {generated}</p>\n",
        title = html_escape(data.title),
        css = CSS,
        generated = data.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    for comparison in data.comparisons {
        html.push_str(&render_comparison(comparison));
    }

    let _ = write!(
        html,
        "<section class=\"facts\">\n<h2>Facts</h2>\n\
         <input type=\"search\" id=\"{search}\" placeholder=\"Search facts...\">\n<nav class=\"tabs\">\n",
        search = html_escape(&data.ids.search_input),
    );
    for (i, category) in Category::ALL.iter().enumerate() {
        let _ = write!(
            html,
            "<button class=\"tab{active}\" data-target=\"{target}\">{title}</button>\n",
            active = if i == 0 { " active" } else { "" },
            target = html_escape(data.ids.container(*category)),
            title = category.title(),
        );
    }
    html.push_str("</nav>\n");

    let _ = writeln!(html, "<div id=\"{}\">", html_escape(&data.ids.tables));
    for container in &data.view.containers {
        html.push_str(&render_container(container));
    }
    html.push_str("</div>\n</section>\n");

    let _ = write!(
        html,
        "<script id=\"{data_id}\" type=\"application/json\">{payload}</script>\n\
         <script>{script}</script>\n</body>\n</html>\n",
        data_id = html_escape(&data.ids.data),
        payload = embed_json(data.facts)?,
        script = SCRIPT
            .replace("__SEARCH_ID__", &data.ids.search_input)
            .replace("__TABLES_ID__", &data.ids.tables),
    );

    Ok(html)
}

/// Bar comparison of company vs sector average
fn render_comparison(comparison: &Comparison) -> String {
    let scale = comparison.max_magnitude();
    let width = |value: f64| -> f64 {
        if scale == 0.0 {
            0.0
        } else {
            (value.abs() / scale * 100.0).min(100.0)
        }
    };

    let mut html = String::new();
    let _ = write!(
        html,
        "<section class=\"metrics\">\n<h2>{}</h2>\n<table class=\"comparison\">\n\
         <thead><tr><th>Metric</th><th>Company</th><th>Sector Average</th><th></th></tr></thead>\n<tbody>\n",
        html_escape(&comparison.title)
    );
    for row in &comparison.rows {
        let _ = write!(
            html,
            "<tr><td>{label}</td><td>{company:.4}</td><td>{sector:.4}</td><td class=\"bars\">\
             <div class=\"bar company\" style=\"width:{cw:.1}%\"></div>\
             <div class=\"bar sector\" style=\"width:{sw:.1}%\"></div></td></tr>\n",
            label = html_escape(&row.label),
            company = row.company,
            sector = row.sector,
            cw = width(row.company),
            sw = width(row.sector),
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
    html
}

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem; color: #222; }
h1 { margin-bottom: 0.2rem; }
.generated { color: #777; margin-top: 0; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1rem; }
th, td { border: 1px solid #ddd; padding: 4px 8px; text-align: left; }
.facts-container th { cursor: pointer; background: #f4f4f4; }
.table-striped tbody tr:nth-child(odd) { background: #fafafa; }
.table-hover tbody tr:hover { background: #eef5ff; }
.mb-4 { margin-bottom: 1.5rem; }
input[type=search] { width: 100%; padding: 6px; margin: 0.5rem 0; }
.tabs button { border: none; background: #eee; padding: 6px 12px; cursor: pointer; }
.tabs button.active { background: #345; color: #fff; }
.facts-container { display: none; }
.facts-container.active { display: block; }
.bars { width: 40%; }
.bar { height: 8px; margin: 2px 0; }
.bar.company { background: #3b7dd8; }
.bar.sector { background: #aaa; }
"#;

const SCRIPT: &str = r#"
document.addEventListener('DOMContentLoaded', function () {
  var search = document.getElementById('__SEARCH_ID__');
  var groups = document.querySelectorAll('.context-group');
  if (search) {
    search.addEventListener('input', function () {
      var term = this.value.toLowerCase();
      groups.forEach(function (group) {
        var anyVisible = false;
        group.querySelectorAll('tbody tr').forEach(function (row) {
          var text = Array.from(row.cells).map(function (c) { return c.textContent; }).join(' ');
          var visible = text.toLowerCase().includes(term);
          row.style.display = visible ? '' : 'none';
          if (visible) anyVisible = true;
        });
        group.style.display = anyVisible ? '' : 'none';
      });
    });
  }
  document.querySelectorAll('#__TABLES_ID__ th').forEach(function (th) {
    th.addEventListener('click', function () {
      var tbody = th.closest('table').querySelector('tbody');
      Array.from(tbody.rows)
        .sort(function (a, b) {
          return a.cells[th.cellIndex].textContent.localeCompare(
            b.cells[th.cellIndex].textContent, undefined, { numeric: true, sensitivity: 'base' });
        })
        .forEach(function (tr) { tbody.appendChild(tr); });
    });
  });
  var tabs = document.querySelectorAll('.tabs button');
  function show(target) {
    tabs.forEach(function (t) { t.classList.toggle('active', t.dataset.target === target); });
    document.querySelectorAll('.facts-container').forEach(function (c) {
      c.classList.toggle('active', c.id === target);
    });
  }
  tabs.forEach(function (t) { t.addEventListener('click', function () { show(t.dataset.target); }); });
  if (tabs.length) show(tabs[0].dataset.target);
});
"#;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryRules;
    use crate::facts::{load_embedded_facts, Fact};
    use crate::metrics::standard_comparisons;
    use crate::xbrl::SectorAverages;
    use chrono::TimeZone;

    fn facts() -> Vec<Fact> {
        vec![
            Fact::new("AssetsCurrent", "100", "FY2023").with_unit("USD"),
            Fact::new("Revenue", "500", "FY2023"),
            Fact::new("Note", "</script><b>", "FY2023"),
            Fact::new("Comment", "<!--<script>", "FY2023"),
        ]
    }

    fn page(facts: &[Fact]) -> String {
        let ids = ElementIds::default();
        let view = FactsView::build(facts, &CategoryRules::default(), &ids);
        let comparisons = standard_comparisons(facts, &SectorAverages::new());
        let data = ReportData {
            title: "AAPL <10-K>",
            facts,
            view: &view,
            comparisons: &comparisons,
            ids: &ids,
            generated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        generate(&data).unwrap()
    }

    #[test]
    fn test_page_has_containers_and_controls() {
        let html = page(&facts());

        for id in ["all-facts", "balance-sheet", "income-statement", "cash-flow"] {
            assert!(html.contains(&format!("<div id=\"{}\"", id)), "missing {}", id);
        }
        assert!(html.contains("<input type=\"search\" id=\"factsSearch\""));
        assert!(html.contains("<div id=\"factsTables\">"));
        assert!(html.contains("document.getElementById('factsSearch')"));
        assert!(html.contains("'#factsTables th'"));
        assert!(html.contains("<title>AAPL &lt;10-K&gt;</title>"));
        assert!(html.contains("Generated 2024-01-02 03:04:05 UTC"));
    }

    #[test]
    fn test_comparisons_rendered() {
        let html = page(&facts());
        assert!(html.contains("<h2>Financial Ratios Comparison</h2>"));
        assert!(html.contains("<h2>European Metrics Comparison</h2>"));
        assert!(html.contains("<td>CurrentRatio</td>"));
    }

    #[test]
    fn test_embedded_payload_round_trips() {
        let facts = facts();
        let html = page(&facts);

        let loaded = load_embedded_facts(&html, "xbrl-facts-data").unwrap().unwrap();
        assert_eq!(loaded, facts);
    }

    #[test]
    fn test_embed_json_cannot_close_script() {
        let json = embed_json(&facts()).unwrap();
        assert!(!json.contains('<'));
        assert!(json.contains("\\u003c/script>"));
        assert!(json.contains("\\u003c!--\\u003cscript>"));
    }

    #[test]
    fn test_comment_opener_does_not_swallow_closing_tag() {
        let html = page(&facts());
        let start = html.find("<script id=\"xbrl-facts-data\"").unwrap();
        let close = start + html[start..].find("</script>").unwrap();
        assert!(!html[start..close].contains("<!--"));

        let loaded = load_embedded_facts(&html, "xbrl-facts-data").unwrap().unwrap();
        assert_eq!(loaded[3].value, "<!--<script>");
    }

    #[test]
    fn test_empty_facts_page() {
        let html = page(&[]);
        assert!(html.contains("[]</script>"));
        assert_eq!(html.matches("class=\"context-group").count(), 0);
    }
}
