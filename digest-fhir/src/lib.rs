//! FHIR JSON to `TransformedBundle` engine: normalization, classification and aggregation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use digest_core::{
    BundleType, DigestError, DigestResult, PayloadPolicy, ProcessedKind, ProcessedResource,
    TransformConfig, TransformedBundle,
};
use serde_json::{json, Value};
use tracing::{debug, info};

pub mod analyze;
pub mod attachments;
pub mod classify;
pub mod fields;
pub mod normalize;

pub use analyze::{analyze_bundle, BundleSummary};
pub use attachments::{
    extract_attachments, extract_attachments_with, ExtractedAttachment, ExtractedBundle,
    ATTACHMENT_REF_URL,
};
pub use classify::{anchor_resource, classify};
pub use normalize::{normalize, normalize_with, presented_form_attachments, SourceKind};

/// Transform a bundle (or a single resource) given as JSON text.
pub fn transform_bundle_str(
    bundle_json: &str,
    config: &TransformConfig,
) -> DigestResult<TransformedBundle> {
    let value: Value =
        serde_json::from_str(bundle_json).map_err(|err| DigestError::Parse(err.to_string()))?;
    transform_bundle_value(&value, config)
}

/// Transform a parsed bundle (or a single resource).
///
/// Only structural problems with the input fail the call. Resources the normalizer cannot map
/// land in the `Unhandled` group instead.
pub fn transform_bundle_value(
    input: &Value,
    config: &TransformConfig,
) -> DigestResult<TransformedBundle> {
    let bundle = as_bundle(input)?;

    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .ok_or(DigestError::MissingData)?;

    let mut aggregate = AggregateData::new(config.payloads);
    for entry in entries {
        let Some(resource) = entry.get("resource").filter(|resource| !resource.is_null()) else {
            continue;
        };
        aggregate.handle_resource(resource);
    }

    let bundle_type = classify(&bundle, &config.profiles, config.policy)?;
    if bundle_type.is_diagnostic_report() {
        aggregate.augment_diagnostic_attachments(entries);
    }

    Ok(aggregate.finalize(bundle_id(&bundle), bundle_type))
}

/// Bundles pass through; a bare resource is wrapped into a one-entry document bundle.
fn as_bundle(input: &Value) -> DigestResult<Cow<'_, Value>> {
    let object = match input {
        Value::Null => return Err(DigestError::MissingData),
        Value::Object(object) => object,
        other => {
            return Err(DigestError::InvalidInput(format!(
                "expected a JSON object, received {}",
                json_kind(other)
            )))
        }
    };

    match object.get("resourceType").and_then(Value::as_str) {
        Some("Bundle") => Ok(Cow::Borrowed(input)),
        Some(resource_type) => {
            debug!(%resource_type, "wrapping bare resource into a document bundle");
            Ok(Cow::Owned(json!({
                "resourceType": "Bundle",
                "id": input.get("id").cloned().unwrap_or(Value::Null),
                "type": "document",
                "entry": [{ "resource": input }],
            })))
        }
        None if object.contains_key("entry") => Ok(Cow::Borrowed(input)),
        None => Err(DigestError::MissingData),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn bundle_id(bundle: &Value) -> String {
    bundle
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

struct AggregateData {
    payloads: PayloadPolicy,
    resources: BTreeMap<ProcessedKind, Vec<ProcessedResource>>,
}

impl AggregateData {
    fn new(payloads: PayloadPolicy) -> Self {
        Self {
            payloads,
            resources: BTreeMap::new(),
        }
    }

    fn handle_resource(&mut self, resource: &Value) {
        let processed = normalize_with(Some(resource), self.payloads);
        if let ProcessedResource::Unhandled(unhandled) = &processed {
            debug!(
                resource_type = %unhandled.original_resource_type,
                detail = unhandled.detail.as_deref().unwrap_or_default(),
                "resource left unhandled"
            );
        }
        self.push(processed);
    }

    fn push(&mut self, processed: ProcessedResource) {
        self.resources
            .entry(processed.kind())
            .or_default()
            .push(processed);
    }

    /// Surface a report's presented form when no attachment was produced otherwise.
    fn augment_diagnostic_attachments(&mut self, entries: &[Value]) {
        if self.resources.contains_key(&ProcessedKind::Attachment) {
            return;
        }

        let synthesized: Vec<_> = entries
            .iter()
            .filter_map(|entry| entry.get("resource"))
            .filter(|resource| {
                resource.get("resourceType").and_then(Value::as_str) == Some("DiagnosticReport")
            })
            .flat_map(|report| presented_form_attachments(report, self.payloads))
            .collect();

        if synthesized.is_empty() {
            return;
        }

        info!(
            count = synthesized.len(),
            "synthesized attachments from diagnostic report presented form"
        );
        for attachment in synthesized {
            self.push(ProcessedResource::Attachment(attachment));
        }
    }

    fn finalize(self, id: String, bundle_type: BundleType) -> TransformedBundle {
        TransformedBundle::new(id, bundle_type, self.resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_object_input_is_invalid() {
        let err = transform_bundle_value(&json!([1, 2]), &TransformConfig::default()).unwrap_err();
        assert!(matches!(err, DigestError::InvalidInput(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = transform_bundle_str("{\"entry\": ", &TransformConfig::default()).unwrap_err();
        assert!(matches!(err, DigestError::Parse(_)));
    }

    #[test]
    fn bare_resource_is_wrapped() {
        let resource = json!({"resourceType": "Patient", "id": "p-7", "name": [{"text": "Asha Rao"}]});
        let bundle = as_bundle(&resource).unwrap();

        assert_eq!(bundle["resourceType"], "Bundle");
        assert_eq!(bundle["type"], "document");
        assert_eq!(bundle["entry"][0]["resource"], resource);
        assert_eq!(bundle_id(&bundle), "p-7");
    }

    #[test]
    fn existing_attachments_suppress_augmentation() {
        let entries = vec![json!({"resource": {
            "resourceType": "DiagnosticReport",
            "presentedForm": [{"contentType": "application/pdf", "data": "JVBERi0x"}]
        }})];

        let mut aggregate = AggregateData::new(PayloadPolicy::Withhold);
        aggregate.handle_resource(&json!({"resourceType": "Binary", "data": "AAAA"}));
        aggregate.augment_diagnostic_attachments(&entries);

        assert_eq!(aggregate.resources[&ProcessedKind::Attachment].len(), 1);
    }
}
