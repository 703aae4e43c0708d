//! Framework-neutral WASM <-> JavaScript bridge.

use std::collections::BTreeMap;

use digest_core::{BundleType, ClassificationPolicy, DigestError, PayloadPolicy, TransformConfig};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

/// Optional overrides on top of [`TransformConfig::default`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsTransformConfig {
    #[serde(default)]
    policy: Option<ClassificationPolicy>,
    #[serde(default)]
    payloads: Option<PayloadPolicy>,
    /// Extra profile URLs, added to the standard table.
    #[serde(default)]
    profiles: Option<BTreeMap<String, BundleType>>,
}

impl From<JsTransformConfig> for TransformConfig {
    fn from(cfg: JsTransformConfig) -> Self {
        let mut base = TransformConfig::default();
        if let Some(policy) = cfg.policy {
            base.policy = policy;
        }
        if let Some(payloads) = cfg.payloads {
            base.payloads = payloads;
        }
        if let Some(profiles) = cfg.profiles {
            base.profiles = profiles
                .into_iter()
                .fold(base.profiles, |registry, (url, bundle_type)| {
                    registry.with_profile(url, bundle_type)
                });
        }
        base
    }
}

#[wasm_bindgen]
pub fn transform_bundle(
    input_bundle: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let bundle_value = read_bundle(input_bundle)?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsTransformConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            TransformConfig::from(cfg)
        }
        None => TransformConfig::default(),
    };

    let transformed = digest_fhir::transform_bundle_value(&bundle_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_digest_error(err)))?;

    to_js(&transformed)
}

#[wasm_bindgen]
pub fn analyze_bundle(input_bundle: JsValue) -> Result<JsValue, JsValue> {
    let bundle_value = read_bundle(input_bundle)?;
    to_js(&digest_fhir::analyze_bundle(&bundle_value))
}

#[wasm_bindgen]
pub fn extract_attachments(input_bundle: JsValue) -> Result<JsValue, JsValue> {
    let bundle_value = read_bundle(input_bundle)?;
    to_js(&digest_fhir::extract_attachments(&bundle_value))
}

fn read_bundle(input_bundle: JsValue) -> Result<serde_json::Value, JsValue> {
    from_value::<serde_json::Value>(input_bundle)
        .map_err(|err| JsValue::from_str(&format!("Could not read JSON bundle: {err}")))
}

/// Maps become plain objects rather than JS `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Could not serialize result: {err}")))
}

fn format_digest_error(err: DigestError) -> String {
    format!("Digest error: {err}")
}
