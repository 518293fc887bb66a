// 📄 Fact Loader - Embedded JSON payload → Fact records
// Reads the facts array a rendered page carries in its data element

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Element id the page uses to carry the facts payload
pub const DEFAULT_DATA_ELEMENT_ID: &str = "xbrl-facts-data";

/// Placeholder shown for a missing unit or decimals attribute
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// FACT
// ============================================================================

/// A single reported financial data point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Semantic label, e.g. "AssetsCurrent"
    pub concept: String,

    /// Reported value as text (numbers are kept verbatim)
    #[serde(default, deserialize_with = "text_or_number")]
    pub value: String,

    /// Reporting context this fact belongs to
    #[serde(rename = "contextRef", default)]
    pub context_ref: String,

    #[serde(
        rename = "unitRef",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_ref: Option<String>,

    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub decimals: Option<String>,
}

impl Fact {
    pub fn new(concept: &str, value: &str, context_ref: &str) -> Self {
        Fact {
            concept: concept.to_string(),
            value: value.to_string(),
            context_ref: context_ref.to_string(),
            unit_ref: None,
            decimals: None,
        }
    }

    /// Builder pattern: add unit reference
    pub fn with_unit(mut self, unit_ref: &str) -> Self {
        self.unit_ref = Some(unit_ref.to_string());
        self
    }

    /// Builder pattern: add decimals attribute
    pub fn with_decimals(mut self, decimals: &str) -> Self {
        self.decimals = Some(decimals.to_string());
        self
    }

    /// Unit for display; empty and absent both show as N/A
    pub fn unit_display(&self) -> &str {
        or_not_available(self.unit_ref.as_deref())
    }

    pub fn decimals_display(&self) -> &str {
        or_not_available(self.decimals.as_deref())
    }
}

fn or_not_available(field: Option<&str>) -> &str {
    match field {
        Some(text) if !text.is_empty() => text,
        _ => NOT_AVAILABLE,
    }
}

/// Accepts `"1000"`, `1000` or `null` for a value field
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Same as `text_or_number`, but `null` stays absent
fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// Byte offset of an `id` attribute equal to `element_id`
///
/// The attribute name must follow whitespace, so `data-id` or `grid` never match.
fn find_id_attribute(page: &str, element_id: &str) -> Option<usize> {
    ['"', '\'']
        .iter()
        .flat_map(|quote| {
            let needle = format!("id={quote}{element_id}{quote}");
            page.match_indices(&needle)
                .map(|(pos, _)| pos)
                .filter(|pos| {
                    page[..*pos]
                        .chars()
                        .next_back()
                        .map_or(false, char::is_whitespace)
                })
                .collect::<Vec<_>>()
        })
        .min()
}

// ============================================================================
// LOADING
// ============================================================================

/// Parse a JSON array of facts
pub fn parse_facts(json: &str) -> Result<Vec<Fact>> {
    serde_json::from_str(json).context("Failed to parse facts JSON payload")
}

/// Text content of the element carrying `id="<element_id>"`
///
/// Only the first matching element is considered. Returns `None` when the
/// element is absent or its closing tag cannot be found.
pub fn extract_embedded_payload<'a>(page: &'a str, element_id: &str) -> Option<&'a str> {
    let attr_pos = find_id_attribute(page, element_id)?;

    let tag_start = page[..attr_pos].rfind('<')?;
    let tag_name: String = page[tag_start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if tag_name.is_empty() {
        return None;
    }

    let content_start = attr_pos + page[attr_pos..].find('>')? + 1;
    let content_len = page[content_start..].find(&format!("</{tag_name}"))?;
    Some(&page[content_start..content_start + content_len])
}

/// Load facts embedded in a page
///
/// A missing data element is logged and yields `Ok(None)` so callers skip
/// rendering. A malformed payload is an error.
pub fn load_embedded_facts(page: &str, element_id: &str) -> Result<Option<Vec<Fact>>> {
    let payload = match extract_embedded_payload(page, element_id) {
        Some(payload) => payload,
        None => {
            tracing::error!(element_id, "Facts data element not found");
            return Ok(None);
        }
    };

    let facts = parse_facts(payload.trim())
        .with_context(|| format!("Malformed payload in element #{}", element_id))?;
    tracing::debug!(count = facts.len(), "Loaded embedded facts");
    Ok(Some(facts))
}

// ============================================================================
// TESTS
// ============================================================================
