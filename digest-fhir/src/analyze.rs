//! Shallow bundle inventory, independent of normalization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleSummary {
    /// The bundle's own `type` field, or `"unknown"`.
    pub bundle_type: String,
    pub entry_count: usize,
    pub resource_types: BTreeSet<String>,
    pub has_attachments: bool,
}

pub fn analyze_bundle(bundle: &Value) -> BundleSummary {
    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let resources = entries.iter().filter_map(|entry| entry.get("resource"));

    let mut resource_types = BTreeSet::new();
    let mut has_attachments = false;
    for resource in resources {
        if let Some(tag) = resource.get("resourceType").and_then(Value::as_str) {
            resource_types.insert(tag.to_string());
        }
        has_attachments |= carries_attachment(resource);
    }

    BundleSummary {
        bundle_type: bundle
            .get("type")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .unwrap_or("unknown")
            .to_string(),
        entry_count: entries.len(),
        resource_types,
        has_attachments,
    }
}

fn carries_attachment(resource: &Value) -> bool {
    let any_in = |field: &str, probe: &str| {
        resource
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().any(|item| item.get(probe).is_some()))
    };

    resource.get("resourceType").and_then(Value::as_str) == Some("Binary")
        || any_in("content", "attachment")
        || any_in("presentedForm", "data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summarizes_types_and_attachments() {
        let bundle = json!({
            "resourceType": "Bundle",
            "type": "document",
            "entry": [
                {"resource": {"resourceType": "Patient"}},
                {"resource": {"resourceType": "Observation"}},
                {"resource": {"resourceType": "Observation"}},
                {"resource": {"resourceType": "DiagnosticReport", "presentedForm": [{"data": "JVBERi0x"}]}},
                {"fullUrl": "urn:uuid:empty"}
            ]
        });

        let summary = analyze_bundle(&bundle);
        assert_eq!(summary.bundle_type, "document");
        assert_eq!(summary.entry_count, 5);
        assert_eq!(
            summary.resource_types.into_iter().collect::<Vec<_>>(),
            vec!["DiagnosticReport", "Observation", "Patient"]
        );
        assert!(summary.has_attachments);
    }

    #[test]
    fn missing_fields_degrade_gracefully() {
        let summary = analyze_bundle(&json!({}));
        assert_eq!(summary.bundle_type, "unknown");
        assert_eq!(summary.entry_count, 0);
        assert!(summary.resource_types.is_empty());
        assert!(!summary.has_attachments);
    }
}
