// 🖨️ Renderer - Container markup
// Serializes the fact view into HTML, one context group per heading + table

use crate::view::{Container, ContextGroup, FactTable, COLUMNS};
use std::fmt::Write as _;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn display_attr(hidden: bool) -> &'static str {
    if hidden {
        r#" style="display:none""#
    } else {
        ""
    }
}

/// Table with the fixed header and one body row per fact
pub fn render_table(table: &FactTable) -> String {
    let mut html = String::from("<table class=\"table table-striped table-hover\">\n<thead>\n<tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &table.rows {
        let _ = write!(html, "<tr{}>", display_attr(row.hidden));
        for cell in row.cells() {
            let _ = write!(html, "<td>{}</td>", html_escape(cell));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn render_group(group: &ContextGroup) -> String {
    format!(
        "<div class=\"context-group mb-4\"{}>\n<h5>{}</h5>\n{}</div>\n",
        display_attr(group.hidden),
        html_escape(&group.heading()),
        render_table(&group.table)
    )
}

/// Inner markup of a container, groups in order
pub fn render_container_body(container: &Container) -> String {
    container.groups.iter().map(render_group).collect()
}

/// Container element with its id and all of its groups
pub fn render_container(container: &Container) -> String {
    format!(
        "<div id=\"{}\" class=\"facts-container\">\n{}</div>\n",
        html_escape(&container.id),
        render_container_body(container)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{Category, CategoryRules};
    use crate::config::ElementIds;
    use crate::facts::Fact;
    use crate::search::apply_search;
    use crate::view::FactsView;

    fn view() -> FactsView {
        let facts = vec![
            Fact::new("AssetsCurrent", "100", "FY2023").with_unit("USD"),
            Fact::new("Revenue", "500", "FY2023"),
            Fact::new("Liabilities", "40", "FY2022"),
        ];
        FactsView::build(&facts, &CategoryRules::default(), &ElementIds::default())
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"A&B's"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_headings_and_tables_per_context() {
        let view = view();
        let html = render_container(view.container(Category::All).unwrap());

        assert!(html.starts_with("<div id=\"all-facts\""));
        assert_eq!(html.matches("<h5>").count(), 2);
        assert_eq!(html.matches("<table").count(), 2);
        assert_eq!(html.matches("<tbody>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 3 * 4);
        assert!(html.contains("<h5>Context: FY2023</h5>"));
        assert!(html.contains("<th>Concept</th><th>Value</th><th>Unit Ref</th><th>Decimals</th>"));
        assert!(html.contains("<td>Revenue</td><td>500</td><td>N/A</td><td>N/A</td>"));
    }

    #[test]
    fn test_hidden_rows_and_groups() {
        let mut view = view();
        apply_search(&mut view, "revenue");
        let html = render_container(view.container(Category::All).unwrap());

        assert_eq!(html.matches("<tr style=\"display:none\">").count(), 2);
        assert_eq!(
            html.matches("<div class=\"context-group mb-4\" style=\"display:none\">").count(),
            1
        );
    }

    #[test]
    fn test_cell_text_is_escaped() {
        let facts = vec![Fact::new("Note<script>", "a & b", "c<1>")];
        let view = FactsView::build(&facts, &CategoryRules::default(), &ElementIds::default());
        let html = render_container(view.container(Category::All).unwrap());

        assert!(html.contains("<td>Note&lt;script&gt;</td>"));
        assert!(html.contains("<td>a &amp; b</td>"));
        assert!(html.contains("<h5>Context: c&lt;1&gt;</h5>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_empty_container() {
        let view = FactsView::build(&[], &CategoryRules::default(), &ElementIds::default());
        let html = render_container_body(view.container(Category::CashFlow).unwrap());
        assert!(html.is_empty());
    }
}
