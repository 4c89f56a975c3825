//! One-level structure summaries

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::documents::Element;

/// Occurrence count of one child tag name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCount {
    /// Child tag name
    pub name: String,
    /// Number of direct children with that name
    pub count: usize,
}

/// Shape of a single element: its name, attribute names and direct children
///
/// `attributes` is `None` (and omitted when serialized) for an element
/// without attributes. Children are listed in first-seen order; an element
/// with no child elements serializes without a `children` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    /// Element tag name
    pub name: String,
    /// Attribute names in document order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    /// Direct child tag names with their counts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildCount>,
}

impl StructureSummary {
    /// Summarize `element`
    pub fn of(element: &Element) -> Self {
        let attributes = if element.has_attributes() {
            Some(
                element
                    .attributes()
                    .iter()
                    .map(|attr| attr.name.clone())
                    .collect(),
            )
        } else {
            None
        };

        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for child in element.child_elements() {
            *counts.entry(child.name()).or_insert(0) += 1;
        }

        Self {
            name: element.name().to_string(),
            attributes,
            children: counts
                .into_iter()
                .map(|(name, count)| ChildCount {
                    name: name.to_string(),
                    count,
                })
                .collect(),
        }
    }

    /// Count for a child tag name, zero if absent
    pub fn count_of(&self, name: &str) -> usize {
        self.children
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use serde_json::json;

    fn summarize(xml: &str) -> StructureSummary {
        StructureSummary::of(Document::from_string(xml).unwrap().root())
    }

    #[test]
    fn test_child_counts_first_seen_order() {
        let summary = summarize("<root><c/><c/><d/></root>");

        assert_eq!(summary.name, "root");
        assert!(summary.attributes.is_none());
        assert_eq!(
            summary.children,
            vec![
                ChildCount { name: "c".into(), count: 2 },
                ChildCount { name: "d".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_interleaved_children_accumulate() {
        let summary = summarize("<root><d/><c/><d/><c/><d/></root>");
        assert_eq!(summary.children[0].name, "d");
        assert_eq!(summary.count_of("d"), 3);
        assert_eq!(summary.count_of("c"), 2);
        assert_eq!(summary.count_of("missing"), 0);
    }

    #[test]
    fn test_only_direct_children_are_counted() {
        let summary = summarize("<root><a><b/><b/></a></root>");
        assert_eq!(summary.children.len(), 1);
        assert_eq!(summary.count_of("b"), 0);
    }

    #[test]
    fn test_attributes_include_namespace_declarations() {
        let summary = summarize(r#"<root xmlns="urn:a" id="7"/>"#);
        assert_eq!(
            summary.attributes,
            Some(vec!["xmlns".to_string(), "id".to_string()])
        );
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let summary = summarize("<root/>");
        assert_eq!(serde_json::to_value(&summary).unwrap(), json!({"name": "root"}));

        let summary = summarize(r#"<root a="1"><c/></root>"#);
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"name": "root", "attributes": ["a"], "children": [{"name": "c", "count": 1}]})
        );
    }
}
