//! Attachment side-channel: lift embedded payloads out of a bundle.
//!
//! The caller's bundle is never modified. Each payload in the returned copy is replaced by an
//! extension pointing at the matching [`ExtractedAttachment`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

pub const ATTACHMENT_REF_URL: &str = "https://fhir-attachment-ref";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedAttachment {
    pub ref_id: String,
    pub content_type: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedBundle {
    /// Lightened copy of the input.
    pub bundle: Value,
    pub attachments: Vec<ExtractedAttachment>,
}

/// Extract attachments using random v4 UUIDs as reference ids.
pub fn extract_attachments(bundle: &Value) -> ExtractedBundle {
    extract_attachments_with(bundle, || Uuid::new_v4().to_string())
}

/// Extract attachments, drawing reference ids from `next_id`.
pub fn extract_attachments_with<F>(bundle: &Value, next_id: F) -> ExtractedBundle
where
    F: FnMut() -> String,
{
    let mut extractor = Extractor {
        next_id,
        attachments: Vec::new(),
    };

    let mut lightened = bundle.clone();
    if let Some(object) = lightened.as_object_mut() {
        object.remove("text");
        if let Some(signature) = object.get_mut("signature").and_then(Value::as_object_mut) {
            extractor.lift(signature, "sigFormat", Some("Bundle Signature".to_string()));
        }
    }

    let resources = lightened
        .get_mut("entry")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get_mut("resource").and_then(Value::as_object_mut));

    for resource in resources {
        resource.remove("text");
        extractor.visit_resource(resource);
    }

    debug!(count = extractor.attachments.len(), "extracted attachments");
    ExtractedBundle {
        bundle: lightened,
        attachments: extractor.attachments,
    }
}

struct Extractor<F> {
    next_id: F,
    attachments: Vec<ExtractedAttachment>,
}

impl<F> Extractor<F>
where
    F: FnMut() -> String,
{
    fn visit_resource(&mut self, resource: &mut Map<String, Value>) {
        let tag = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .map(str::to_string);

        match tag.as_deref() {
            Some("DiagnosticReport") => {
                for form in array_objects(resource, "presentedForm") {
                    let title = title_of(form);
                    self.lift(form, "contentType", title);
                }
            }
            Some("DocumentReference") => {
                for content in array_objects(resource, "content") {
                    if let Some(attachment) =
                        content.get_mut("attachment").and_then(Value::as_object_mut)
                    {
                        let title = title_of(attachment);
                        self.lift(attachment, "contentType", title);
                    }
                }
            }
            Some("Binary") => {
                self.lift(resource, "contentType", Some("Binary Document".to_string()));
            }
            _ => {}
        }
    }

    /// Move `data` out of `holder` and leave a reference extension in its place.
    fn lift(
        &mut self,
        holder: &mut Map<String, Value>,
        content_type_field: &str,
        title: Option<String>,
    ) {
        let data = match holder.get("data") {
            Some(Value::String(data)) if !data.is_empty() => data.clone(),
            _ => return,
        };
        holder.remove("data");

        let ref_id = (self.next_id)();
        let content_type = holder
            .get(content_type_field)
            .and_then(Value::as_str)
            .filter(|content_type| !content_type.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let reference = json!({ "url": ATTACHMENT_REF_URL, "valueString": ref_id });
        match holder.get_mut("extension").and_then(Value::as_array_mut) {
            Some(extensions) => extensions.push(reference),
            None => {
                holder.insert("extension".to_string(), Value::Array(vec![reference]));
            }
        }

        self.attachments.push(ExtractedAttachment {
            ref_id,
            content_type,
            data,
            title,
        });
    }
}

fn array_objects<'a>(
    resource: &'a mut Map<String, Value>,
    field: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    resource
        .get_mut(field)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn title_of(holder: &Map<String, Value>) -> Option<String> {
    holder.get("title").and_then(Value::as_str).map(str::to_string)
}
