//! Bundle classifier.

use digest_core::{BundleType, ClassificationPolicy, DigestError, DigestResult, ProfileRegistry};
use serde_json::Value;
use tracing::{debug, warn};

use crate::fields::opt_text;

const INPATIENT_CLASSES: [&str; 3] = ["IMP", "ACUTE", "NONAC"];
const AMBULATORY_CLASS: &str = "AMB";
const VITAL_SIGNS: &str = "vital-signs";

/// Marker resources recognized by the structural scan, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    DiagnosticReport,
    Prescription,
    InpatientEncounter,
    Immunization,
    AmbulatoryEncounter,
    VitalSigns,
    Invoice,
    Document,
}

impl Marker {
    const PRECEDENCE: [Marker; 8] = [
        Marker::DiagnosticReport,
        Marker::Prescription,
        Marker::InpatientEncounter,
        Marker::Immunization,
        Marker::AmbulatoryEncounter,
        Marker::VitalSigns,
        Marker::Invoice,
        Marker::Document,
    ];

    fn bundle_type(&self) -> BundleType {
        match self {
            Self::DiagnosticReport => BundleType::DiagnosticReportRecord,
            Self::Prescription => BundleType::PrescriptionRecord,
            Self::InpatientEncounter => BundleType::DischargeSummaryRecord,
            Self::Immunization => BundleType::ImmunizationRecord,
            Self::AmbulatoryEncounter => BundleType::OPConsultRecord,
            Self::VitalSigns => BundleType::WellnessRecord,
            Self::Invoice => BundleType::InvoiceRecord,
            Self::Document => BundleType::HealthDocumentRecord,
        }
    }

    fn matches(&self, resource: &Value) -> bool {
        let tag = opt_text(resource, "resourceType").unwrap_or_default();
        match self {
            Self::DiagnosticReport => tag == "DiagnosticReport",
            Self::Prescription => tag == "MedicationRequest",
            Self::InpatientEncounter => {
                tag == "Encounter"
                    && encounter_class(resource)
                        .is_some_and(|class| INPATIENT_CLASSES.contains(&class.as_str()))
            }
            Self::Immunization => tag == "Immunization",
            Self::AmbulatoryEncounter => {
                tag == "Encounter"
                    && encounter_class(resource).is_some_and(|class| class == AMBULATORY_CLASS)
            }
            Self::VitalSigns => tag == "Observation" && has_vital_signs_category(resource),
            Self::Invoice => tag == "Invoice",
            Self::Document => tag == "DocumentReference",
        }
    }
}

fn encounter_class(encounter: &Value) -> Option<String> {
    encounter.get("class").and_then(|class| opt_text(class, "code"))
}

fn has_vital_signs_category(observation: &Value) -> bool {
    observation
        .get("category")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|category| category.get("coding").and_then(Value::as_array))
        .flatten()
        .any(|coding| coding.get("code").and_then(Value::as_str) == Some(VITAL_SIGNS))
}

fn entry_resources(bundle: &Value) -> DigestResult<impl Iterator<Item = &Value>> {
    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .filter(|entries| !entries.is_empty())
        .ok_or(DigestError::MissingData)?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("resource"))
        .filter(|resource| !resource.is_null()))
}

/// The first entry carrying a resource.
pub fn anchor_resource(bundle: &Value) -> DigestResult<&Value> {
    entry_resources(bundle)?
        .next()
        .ok_or(DigestError::MissingAnchor)
}

fn declared_profile(resource: &Value) -> Option<&str> {
    resource
        .get("meta")
        .and_then(|meta| meta.get("profile"))
        .and_then(Value::as_array)
        .and_then(|profiles| profiles.first())
        .and_then(Value::as_str)
}

/// Classify a raw bundle.
///
/// A registry hit on the anchor's first declared profile always wins. Otherwise the policy
/// decides: the anchor's own `resourceType`, or a precedence-ordered scan over every entry.
pub fn classify(
    bundle: &Value,
    profiles: &ProfileRegistry,
    policy: ClassificationPolicy,
) -> DigestResult<BundleType> {
    let anchor = anchor_resource(bundle)?;

    if let Some(profile) = declared_profile(anchor) {
        match profiles.lookup(profile) {
            Some(bundle_type) => {
                debug!(%profile, %bundle_type, "classified by profile");
                return Ok(bundle_type.clone());
            }
            None => warn!(%profile, "declared profile is not registered"),
        }
    }

    let bundle_type = match policy {
        ClassificationPolicy::ProfileFirst => {
            BundleType::from(opt_text(anchor, "resourceType").unwrap_or_else(|| "Unknown".into()))
        }
        ClassificationPolicy::StructuralHeuristic => {
            let resources: Vec<&Value> = entry_resources(bundle)?.collect();
            Marker::PRECEDENCE
                .into_iter()
                .find(|marker| resources.iter().any(|resource| marker.matches(resource)))
                .map(|marker| marker.bundle_type())
                .ok_or(DigestError::UnknownBundleType)?
        }
    };

    debug!(?policy, %bundle_type, "classified without profile");
    Ok(bundle_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(resources: Vec<Value>) -> Value {
        json!({
            "resourceType": "Bundle",
            "type": "document",
            "entry": resources.into_iter().map(|resource| json!({"resource": resource})).collect::<Vec<_>>()
        })
    }

    fn profile_first(bundle: &Value) -> DigestResult<BundleType> {
        classify(
            bundle,
            &ProfileRegistry::standard(),
            ClassificationPolicy::ProfileFirst,
        )
    }

    fn heuristic(bundle: &Value) -> DigestResult<BundleType> {
        classify(
            bundle,
            &ProfileRegistry::standard(),
            ClassificationPolicy::StructuralHeuristic,
        )
    }

    #[test]
    fn empty_or_anchorless_bundles_fail_validation() {
        let registry = ProfileRegistry::standard();
        let policy = ClassificationPolicy::ProfileFirst;

        assert!(matches!(
            classify(&json!({}), &registry, policy),
            Err(DigestError::MissingData)
        ));
        assert!(matches!(
            classify(&json!({"entry": []}), &registry, policy),
            Err(DigestError::MissingData)
        ));
        let anchorless = json!({"entry": [{"fullUrl": "urn:a"}, {"resource": null}]});
        assert!(matches!(
            classify(&anchorless, &registry, policy),
            Err(DigestError::MissingAnchor)
        ));
    }

    #[test]
    fn registered_profile_beats_both_policies() {
        let input = bundle(vec![
            json!({
                "resourceType": "Composition",
                "meta": {"profile": ["https://nrces.in/ndhm/fhir/r4/StructureDefinition/OPConsultRecord"]}
            }),
            json!({"resourceType": "DiagnosticReport"}),
        ]);

        for policy in [
            ClassificationPolicy::ProfileFirst,
            ClassificationPolicy::StructuralHeuristic,
        ] {
            assert_eq!(
                classify(&input, &ProfileRegistry::standard(), policy).unwrap(),
                BundleType::OPConsultRecord
            );
        }
    }

    #[test]
    fn injected_registry_replaces_standard_table() {
        let input = bundle(vec![json!({
            "resourceType": "Composition",
            "meta": {"profile": ["urn:local:lab-report"]}
        })]);
        let registry = ProfileRegistry::empty()
            .with_profile("urn:local:lab-report", BundleType::DiagnosticReportRecord);

        assert_eq!(
            classify(&input, &registry, ClassificationPolicy::ProfileFirst).unwrap(),
            BundleType::DiagnosticReportRecord
        );
        assert_eq!(
            profile_first(&input).unwrap(),
            BundleType::from("Composition")
        );
    }

    #[test]
    fn vital_signs_observation_per_policy() {
        let input = bundle(vec![json!({
            "resourceType": "Observation",
            "category": [{"coding": [{"system": "http://terminology.hl7.org/CodeSystem/observation-category", "code": "vital-signs"}]}],
            "valueQuantity": {"value": 72, "unit": "beats/min"}
        })]);

        assert_eq!(heuristic(&input).unwrap(), BundleType::WellnessRecord);
        assert_eq!(
            profile_first(&input).unwrap(),
            BundleType::Resource("Observation".to_string())
        );
    }

    #[test]
    fn heuristic_precedence_breaks_ties() {
        let input = bundle(vec![
            json!({"resourceType": "Patient"}),
            json!({"resourceType": "Encounter", "class": {"code": "AMB"}}),
            json!({"resourceType": "Immunization"}),
            json!({"resourceType": "Encounter", "class": {"code": "IMP"}}),
        ]);
        assert_eq!(heuristic(&input).unwrap(), BundleType::DischargeSummaryRecord);

        let with_order = bundle(vec![
            json!({"resourceType": "Encounter", "class": {"code": "IMP"}}),
            json!({"resourceType": "MedicationRequest"}),
        ]);
        assert_eq!(heuristic(&with_order).unwrap(), BundleType::PrescriptionRecord);

        let document_only = bundle(vec![
            json!({"resourceType": "Patient"}),
            json!({"resourceType": "DocumentReference"}),
        ]);
        assert_eq!(heuristic(&document_only).unwrap(), BundleType::HealthDocumentRecord);

        let report_and_prescription = bundle(vec![
            json!({"resourceType": "MedicationRequest"}),
            json!({"resourceType": "DiagnosticReport"}),
        ]);
        assert_eq!(
            heuristic(&report_and_prescription).unwrap(),
            BundleType::DiagnosticReportRecord
        );

        let vitals_and_invoice = bundle(vec![
            json!({"resourceType": "Invoice"}),
            json!({"resourceType": "Observation", "category": [{"coding": [{"code": "vital-signs"}]}]}),
        ]);
        assert_eq!(heuristic(&vitals_and_invoice).unwrap(), BundleType::WellnessRecord);

        let invoice_and_document = bundle(vec![
            json!({"resourceType": "DocumentReference"}),
            json!({"resourceType": "Invoice"}),
        ]);
        assert_eq!(heuristic(&invoice_and_document).unwrap(), BundleType::InvoiceRecord);
    }

    #[test]
    fn heuristic_without_markers_is_unknown() {
        let input = bundle(vec![
            json!({"resourceType": "Patient"}),
            json!({"resourceType": "Observation", "category": [{"coding": [{"code": "laboratory"}]}]}),
        ]);
        let err = heuristic(&input).unwrap_err();
        assert!(matches!(err, DigestError::UnknownBundleType));
        assert!(!err.is_validation());
    }

    #[test]
    fn missing_resource_type_falls_back_to_unknown_tag() {
        let input = bundle(vec![json!({"id": "x"})]);
        assert_eq!(
            profile_first(&input).unwrap(),
            BundleType::from("Unknown")
        );
    }
}
