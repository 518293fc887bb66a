// 📥 XBRL Document - Raw filing JSON → facts + sector averages
// Expected shape: {"xbrl_content": {"children": [...]}, "sector_averages": {...}}

use crate::facts::Fact;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Metric name → sector average value
pub type SectorAverages = HashMap<String, f64>;

#[derive(Debug, Clone)]
pub struct XbrlDocument {
    children: Vec<Value>,
    sector_averages: SectorAverages,
}

impl XbrlDocument {
    /// Parse a document from JSON text
    pub fn parse(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| anyhow!("Error decoding JSON: {}", e))?;

        let content = root
            .as_object()
            .and_then(|obj| obj.get("xbrl_content"))
            .ok_or_else(|| anyhow!("Unexpected JSON structure"))?;

        let children = match content.get("children") {
            Some(Value::Array(children)) => children.clone(),
            Some(_) => bail!("Unexpected JSON structure: xbrl_content.children is not an array"),
            None => Vec::new(),
        };

        let sector_averages = root
            .get("sector_averages")
            .and_then(Value::as_object)
            .map(parse_sector_averages)
            .unwrap_or_default();

        Ok(XbrlDocument {
            children,
            sector_averages,
        })
    }

    pub fn children(&self) -> &[Value] {
        &self.children
    }

    pub fn sector_averages(&self) -> &SectorAverages {
        &self.sector_averages
    }

    /// Every child carrying both a tag and attributes becomes a fact
    pub fn extract_facts(&self) -> Vec<Fact> {
        self.children.iter().filter_map(fact_from_child).collect()
    }

    /// Every tagged child, with or without attributes, for metric lookups
    pub fn metric_facts(&self) -> Vec<Fact> {
        self.children
            .iter()
            .filter_map(|child| {
                let tag = child.get("tag")?;
                let value = child.get("text").map(value_text).unwrap_or_default();
                Some(fact_from_child(child).unwrap_or_else(|| Fact::new(&value_text(tag), &value, "")))
            })
            .collect()
    }
}

fn fact_from_child(child: &Value) -> Option<Fact> {
    let tag = child.get("tag")?;
    let attributes = child.get("attributes")?;

    let attribute = |name: &str| -> String {
        attributes
            .get(name)
            .map(value_text)
            .unwrap_or_default()
    };

    Some(Fact {
        concept: value_text(tag),
        value: child.get("text").map(value_text).unwrap_or_default(),
        context_ref: attribute("contextRef"),
        unit_ref: Some(attribute("unitRef")),
        decimals: Some(attribute("decimals")),
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numeric entries only; anything else is skipped
fn parse_sector_averages(map: &Map<String, Value>) -> SectorAverages {
    map.iter()
        .filter_map(|(name, value)| {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.replace(',', "").trim().parse().ok(),
                _ => None,
            };
            if number.is_none() {
                tracing::warn!(metric = %name, "Skipping non-numeric sector average");
            }
            number.map(|n| (name.clone(), n))
        })
        .collect()
}

/// Read and parse a document from disk
pub fn load_xbrl_document<P: AsRef<Path>>(path: P) -> Result<XbrlDocument> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            bail!("XBRL data file not found: {:?}", path)
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read XBRL data file: {:?}", path))
        }
    };

    let document = XbrlDocument::parse(&content)
        .with_context(|| format!("Invalid XBRL data file: {:?}", path))?;
    tracing::info!(
        path = %path.display(),
        children = document.children.len(),
        "Loaded XBRL document"
    );
    Ok(document)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"{
        "xbrl_content": {
            "children": [
                {"tag": "us-gaap:AssetsCurrent", "text": "143,566",
                 "attributes": {"contextRef": "FY2023", "unitRef": "usd", "decimals": "-6"}},
                {"tag": "us-gaap:Revenues", "text": "383,285", "attributes": {"contextRef": "FY2023"}},
                {"tag": "link:schemaRef", "text": "ignored"},
                {"text": "no tag", "attributes": {}}
            ]
        },
        "sector_averages": {"CurrentRatio": 1.5, "ProfitMargin": "0.2", "Note": "n/a"}
    }"#;

    #[test]
    fn test_extract_facts() {
        let doc = XbrlDocument::parse(DOCUMENT).unwrap();
        let facts = doc.extract_facts();

        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].concept, "us-gaap:AssetsCurrent");
        assert_eq!(facts[0].value, "143,566");
        assert_eq!(facts[0].context_ref, "FY2023");
        assert_eq!(facts[0].unit_display(), "usd");
        assert_eq!(facts[1].unit_display(), "N/A");
        assert_eq!(facts[1].decimals_display(), "N/A");
    }

    #[test]
    fn test_metric_facts_include_children_without_attributes() {
        let doc = XbrlDocument::parse(DOCUMENT).unwrap();
        let facts = doc.metric_facts();

        assert_eq!(facts.len(), 3);
        assert_eq!(facts[2].concept, "link:schemaRef");
        assert_eq!(facts[2].value, "ignored");
        assert_eq!(facts[0], doc.extract_facts()[0]);
    }

    #[test]
    fn test_sector_averages() {
        let doc = XbrlDocument::parse(DOCUMENT).unwrap();
        let averages = doc.sector_averages();
        assert_eq!(averages.get("CurrentRatio"), Some(&1.5));
        assert_eq!(averages.get("ProfitMargin"), Some(&0.2));
        assert!(averages.get("Note").is_none());
    }

    #[test]
    fn test_missing_sector_averages_is_empty() {
        let doc = XbrlDocument::parse(r#"{"xbrl_content": {"children": []}}"#).unwrap();
        assert!(doc.sector_averages().is_empty());
        assert!(doc.extract_facts().is_empty());
    }

    #[test]
    fn test_unexpected_structure() {
        for json in [r#"[1, 2]"#, r#"{"facts": []}"#] {
            let err = XbrlDocument::parse(json).unwrap_err();
            assert!(err.to_string().contains("Unexpected JSON structure"));
        }
    }

    #[test]
    fn test_decode_error() {
        let err = XbrlDocument::parse("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Error decoding JSON"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_xbrl_document("/nonexistent/aapl.json").unwrap_err();
        assert!(err.to_string().contains("XBRL data file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let doc = load_xbrl_document(file.path()).unwrap();
        assert_eq!(doc.children().len(), 4);
    }
}
