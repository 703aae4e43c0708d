//! Engine configuration: classification policy, profile table and payload handling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BundleType, WITHHELD_PAYLOAD};

const PROFILE_BASE: &str = "https://nrces.in/ndhm/fhir/r4/StructureDefinition/";

/// Settings for one transformation run. Resolve once, then pass by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TransformConfig {
    pub policy: ClassificationPolicy,
    pub profiles: ProfileRegistry,
    pub payloads: PayloadPolicy,
}

/// How a bundle is classified once its anchor profile misses the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// Fall back to the anchor's own `resourceType`. Never fails on a valid bundle.
    #[default]
    ProfileFirst,
    /// Scan every entry for marker resources in a fixed precedence order.
    StructuralHeuristic,
}

/// Whether attachment bytes are copied into normalized records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPolicy {
    #[default]
    Withhold,
    Include,
}

impl PayloadPolicy {
    pub fn render(&self, data: &str) -> String {
        match self {
            Self::Withhold => WITHHELD_PAYLOAD.to_string(),
            Self::Include => data.to_string(),
        }
    }
}

/// Read-only mapping from canonical profile URL to bundle type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, BundleType>,
}

impl ProfileRegistry {
    /// Registry with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// The national document-record profiles, each mapped to the tag of the same name.
    pub fn standard() -> Self {
        BundleType::RECORDS
            .into_iter()
            .fold(Self::empty(), |registry, record| {
                let url = format!("{PROFILE_BASE}{}", record.as_str());
                registry.with_profile(url, record)
            })
    }

    pub fn with_profile(mut self, url: impl Into<String>, bundle_type: BundleType) -> Self {
        self.profiles.insert(url.into(), bundle_type);
        self
    }

    pub fn lookup(&self, url: &str) -> Option<&BundleType> {
        self.profiles.get(url)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_maps_every_record() {
        let registry = ProfileRegistry::standard();
        assert_eq!(registry.len(), BundleType::RECORDS.len());
        assert_eq!(
            registry.lookup(
                "https://nrces.in/ndhm/fhir/r4/StructureDefinition/PrescriptionRecord"
            ),
            Some(&BundleType::PrescriptionRecord)
        );
        assert_eq!(registry.lookup("http://example.org/unknown"), None);
    }

    #[test]
    fn config_deserializes_partial_json() {
        let config: TransformConfig = serde_json::from_str(
            r#"{"policy": "structural_heuristic", "profiles": {"urn:test": "InvoiceRecord"}}"#,
        )
        .unwrap();

        assert_eq!(config.policy, ClassificationPolicy::StructuralHeuristic);
        assert_eq!(config.payloads, PayloadPolicy::Withhold);
        assert_eq!(
            config.profiles.lookup("urn:test"),
            Some(&BundleType::InvoiceRecord)
        );
        assert!(config
            .profiles
            .lookup("https://nrces.in/ndhm/fhir/r4/StructureDefinition/InvoiceRecord")
            .is_none());
    }

    #[test]
    fn payload_policy_withholds_by_default() {
        assert_eq!(PayloadPolicy::default().render("JVBERi0x"), WITHHELD_PAYLOAD);
        assert_eq!(PayloadPolicy::Include.render("JVBERi0x"), "JVBERi0x");
    }
}
