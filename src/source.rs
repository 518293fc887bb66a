// 📂 Fact Sources - Where facts come from
// A raw XBRL JSON document, or a previously rendered page with embedded facts

use crate::facts::{load_embedded_facts, Fact};
use crate::metrics::{standard_comparisons, Comparison};
use crate::xbrl::{load_xbrl_document, SectorAverages};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    XbrlDocument,
    EmbeddedPage,
}

impl SourceKind {
    /// `.html`/`.htm` files are pages; anything else is an XBRL document
    pub fn detect(path: &Path) -> Self {
        let is_page = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
            .unwrap_or(false);

        if is_page {
            SourceKind::EmbeddedPage
        } else {
            SourceKind::XbrlDocument
        }
    }
}

/// Facts plus whatever sector data came with them
#[derive(Debug, Clone, Default)]
pub struct LoadedFacts {
    pub facts: Vec<Fact>,
    /// Facts the metrics read; documents also contribute attribute-less children
    pub metric_facts: Vec<Fact>,
    pub sector_averages: SectorAverages,
}

impl LoadedFacts {
    pub fn comparisons(&self) -> Vec<Comparison> {
        standard_comparisons(&self.metric_facts, &self.sector_averages)
    }
}

/// Load facts from a path
///
/// `Ok(None)` means a page without its data element; the caller should stop
/// without rendering.
pub fn load_source(path: &Path, data_element_id: &str) -> Result<Option<LoadedFacts>> {
    match SourceKind::detect(path) {
        SourceKind::XbrlDocument => {
            let document = load_xbrl_document(path)?;
            Ok(Some(LoadedFacts {
                facts: document.extract_facts(),
                metric_facts: document.metric_facts(),
                sector_averages: document.sector_averages().clone(),
            }))
        }
        SourceKind::EmbeddedPage => {
            let page = fs::read_to_string(path)
                .with_context(|| format!("Failed to read page: {:?}", path))?;
            Ok(load_embedded_facts(&page, data_element_id)?.map(|facts| LoadedFacts {
                metric_facts: facts.clone(),
                facts,
                sector_averages: SectorAverages::new(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect() {
        assert_eq!(SourceKind::detect(Path::new("aapl.json")), SourceKind::XbrlDocument);
        assert_eq!(SourceKind::detect(Path::new("report.HTML")), SourceKind::EmbeddedPage);
        assert_eq!(SourceKind::detect(Path::new("report.htm")), SourceKind::EmbeddedPage);
        assert_eq!(SourceKind::detect(Path::new("noext")), SourceKind::XbrlDocument);
    }

    #[test]
    fn test_load_page_without_data_element() {
        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        write!(file, "<html><body></body></html>").unwrap();

        let loaded = load_source(file.path(), "xbrl-facts-data").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_page_with_data_element() {
        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        write!(
            file,
            r#"<script id="xbrl-facts-data">[{{"concept":"Assets","value":"1","contextRef":"c"}}]</script>"#
        )
        .unwrap();

        let loaded = load_source(file.path(), "xbrl-facts-data").unwrap().unwrap();
        assert_eq!(loaded.facts.len(), 1);
        assert!(loaded.sector_averages.is_empty());
    }

    #[test]
    fn test_load_xbrl_document() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"xbrl_content":{{"children":[{{"tag":"Revenue","text":"9","attributes":{{"contextRef":"c"}}}}]}},
                "sector_averages":{{"ProfitMargin":0.1}}}}"#
        )
        .unwrap();

        let loaded = load_source(file.path(), "unused").unwrap().unwrap();
        assert_eq!(loaded.facts[0].concept, "Revenue");
        assert_eq!(loaded.sector_averages.get("ProfitMargin"), Some(&0.1));
    }

    #[test]
    fn test_metrics_read_children_without_attributes() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"xbrl_content":{{"children":[
                {{"tag":"Revenue","text":"200"}},
                {{"tag":"ProfitLoss","text":"50","attributes":{{"contextRef":"c"}}}}]}}}}"#
        )
        .unwrap();

        let loaded = load_source(file.path(), "unused").unwrap().unwrap();
        assert_eq!(loaded.facts.len(), 1);
        assert_eq!(loaded.metric_facts.len(), 2);

        let comparisons = loaded.comparisons();
        let margin = comparisons[0].rows.iter().find(|r| r.label == "ProfitMargin").unwrap();
        assert_eq!(margin.company, 0.25);
    }
}
