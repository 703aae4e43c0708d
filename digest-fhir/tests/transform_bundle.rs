use digest_core::{
    BundleType, ClassificationPolicy, DigestError, PayloadPolicy, ProcessedKind,
    ProcessedResource, ProfileRegistry, TransformConfig, WITHHELD_PAYLOAD,
};
use digest_fhir::{
    extract_attachments_with, normalize, transform_bundle_value, SourceKind, ATTACHMENT_REF_URL,
};
use serde_json::{json, Value};

fn bundle(resources: Vec<Value>) -> Value {
    json!({
        "resourceType": "Bundle",
        "id": "bundle-under-test",
        "type": "collection",
        "entry": resources
            .into_iter()
            .map(|resource| json!({ "resource": resource }))
            .collect::<Vec<_>>()
    })
}

fn heuristic_config() -> TransformConfig {
    TransformConfig {
        policy: ClassificationPolicy::StructuralHeuristic,
        ..TransformConfig::default()
    }
}

fn minimal_resource(kind: SourceKind) -> Value {
    match kind {
        SourceKind::DocumentReference => json!({
            "resourceType": "DocumentReference",
            "content": [{ "attachment": { "contentType": "application/pdf", "data": "JVBERi0x" } }]
        }),
        SourceKind::Binary => json!({ "resourceType": "Binary", "data": "JVBERi0x" }),
        other => json!({ "resourceType": other.as_str() }),
    }
}

#[test]
fn every_normalizer_yields_its_designated_kind() {
    for kind in SourceKind::ALL {
        let processed = normalize(Some(&minimal_resource(kind)));
        assert_eq!(processed.kind(), kind.designated_kind(), "{}", kind.as_str());
    }
}

#[test]
fn group_sizes_match_resource_entries() {
    let input = json!({
        "resourceType": "Bundle",
        "entry": [
            { "resource": { "resourceType": "Patient", "id": "p1" } },
            { "fullUrl": "urn:uuid:no-resource" },
            { "resource": null },
            { "resource": { "resourceType": "Observation", "valueString": "first" } },
            { "resource": { "resourceType": "Flag" } },
            { "resource": { "resourceType": "Observation", "valueString": "second" } },
            { "resource": { "resourceType": "Binary" } }
        ]
    });

    let transformed = transform_bundle_value(&input, &TransformConfig::default()).unwrap();

    assert_eq!(transformed.total(), 5);
    assert_eq!(transformed.count(ProcessedKind::PatientInfo), 1);
    assert_eq!(transformed.count(ProcessedKind::Unhandled), 2);
    assert_eq!(transformed.bundle_type, BundleType::from("Patient"));
    assert_eq!(transformed.id, "");

    let values: Vec<_> = transformed
        .group(ProcessedKind::ObservationResult)
        .iter()
        .map(|processed| match processed {
            ProcessedResource::ObservationResult(result) => result.value.as_str(),
            other => panic!("unexpected record {other:?}"),
        })
        .collect();
    assert_eq!(values, vec!["first", "second"]);
}

#[test]
fn prescription_profile_scenario() {
    let input = bundle(vec![
        json!({
            "resourceType": "Composition",
            "meta": { "profile": ["https://nrces.in/ndhm/fhir/r4/StructureDefinition/PrescriptionRecord"] },
            "title": "Prescription"
        }),
        json!({ "resourceType": "Patient", "name": [{ "given": ["Ravi"], "family": "Kumar" }] }),
        json!({ "resourceType": "Practitioner", "name": [{ "text": "Dr. Nair" }] }),
        json!({ "resourceType": "MedicationRequest", "medicationCodeableConcept": { "text": "Metformin" } }),
        json!({ "resourceType": "MedicationRequest", "medicationCodeableConcept": { "text": "Atorvastatin" } }),
        json!({ "resourceType": "Condition", "code": { "text": "Type 2 diabetes" } }),
    ]);

    for config in [TransformConfig::default(), heuristic_config()] {
        let transformed = transform_bundle_value(&input, &config).unwrap();
        assert_eq!(transformed.bundle_type, BundleType::PrescriptionRecord);
        assert_eq!(transformed.count(ProcessedKind::PatientInfo), 1);
        assert_eq!(transformed.count(ProcessedKind::PractitionerInfo), 1);
        assert_eq!(transformed.count(ProcessedKind::MedicationInfo), 2);
        assert_eq!(transformed.count(ProcessedKind::ConditionInfo), 1);
    }
}

#[test]
fn vital_signs_observation_classification_depends_on_policy() {
    let input = bundle(vec![json!({
        "resourceType": "Observation",
        "category": [{ "coding": [{ "code": "vital-signs" }] }],
        "code": { "text": "Body temperature" },
        "valueQuantity": { "value": 98.6, "unit": "F" }
    })]);

    let structural = transform_bundle_value(&input, &heuristic_config()).unwrap();
    assert_eq!(structural.bundle_type, BundleType::WellnessRecord);

    let fallback = transform_bundle_value(&input, &TransformConfig::default()).unwrap();
    assert_eq!(fallback.bundle_type, BundleType::from("Observation"));

    let ProcessedResource::ObservationResult(result) =
        &fallback.group(ProcessedKind::ObservationResult)[0]
    else {
        panic!("expected an observation");
    };
    assert_eq!(result.value, "98.6");
    assert_eq!(result.unit, "F");
}

#[test]
fn diagnostic_report_presented_form_becomes_attachment() {
    let input = bundle(vec![
        json!({
            "resourceType": "DiagnosticReport",
            "code": { "text": "Complete blood count" },
            "presentedForm": [{ "contentType": "application/pdf", "data": "JVBERi0x", "title": "CBC report" }]
        }),
        json!({ "resourceType": "Patient" }),
    ]);

    let transformed = transform_bundle_value(&input, &TransformConfig::default()).unwrap();
    assert!(transformed.bundle_type.is_diagnostic_report());
    assert_eq!(transformed.count(ProcessedKind::DiagnosticReportInfo), 1);

    let attachments = transformed.group(ProcessedKind::Attachment);
    assert_eq!(attachments.len(), 1);
    let ProcessedResource::Attachment(attachment) = &attachments[0] else {
        panic!("expected an attachment");
    };
    assert_eq!(attachment.content_type, "application/pdf");
    assert_eq!(attachment.data, WITHHELD_PAYLOAD);
    assert_eq!(attachment.title.as_deref(), Some("CBC report"));

    let config = TransformConfig {
        payloads: PayloadPolicy::Include,
        ..heuristic_config()
    };
    let transformed = transform_bundle_value(&input, &config).unwrap();
    assert_eq!(transformed.bundle_type, BundleType::DiagnosticReportRecord);
    let ProcessedResource::Attachment(attachment) = &transformed.group(ProcessedKind::Attachment)[0]
    else {
        panic!("expected an attachment");
    };
    assert_eq!(attachment.data, "JVBERi0x");
}

#[test]
fn presented_form_is_ignored_outside_diagnostic_bundles() {
    let input = bundle(vec![
        json!({ "resourceType": "Patient" }),
        json!({
            "resourceType": "DiagnosticReport",
            "presentedForm": [{ "data": "JVBERi0x" }]
        }),
    ]);

    let transformed = transform_bundle_value(&input, &TransformConfig::default()).unwrap();
    assert_eq!(transformed.bundle_type, BundleType::from("Patient"));
    assert_eq!(transformed.count(ProcessedKind::Attachment), 0);
}

#[test]
fn bare_resource_is_transformed() {
    let resource = json!({ "resourceType": "Immunization", "id": "imm-1", "vaccineCode": { "text": "BCG" } });

    let transformed = transform_bundle_value(&resource, &heuristic_config()).unwrap();
    assert_eq!(transformed.id, "imm-1");
    assert_eq!(transformed.bundle_type, BundleType::ImmunizationRecord);
    assert_eq!(transformed.count(ProcessedKind::ImmunizationInfo), 1);
}

#[test]
fn structural_failures_abort_the_call() {
    let config = TransformConfig::default();

    assert!(matches!(
        transform_bundle_value(&json!({}), &config),
        Err(DigestError::MissingData)
    ));
    assert!(matches!(
        transform_bundle_value(&Value::Null, &config),
        Err(DigestError::MissingData)
    ));
    assert!(matches!(
        transform_bundle_value(&json!({ "resourceType": "Bundle", "entry": [] }), &config),
        Err(DigestError::MissingData)
    ));
    let anchorless = json!({ "resourceType": "Bundle", "entry": [{ "fullUrl": "x" }] });
    assert!(matches!(
        transform_bundle_value(&anchorless, &config),
        Err(DigestError::MissingAnchor)
    ));

    let patient_only = bundle(vec![json!({ "resourceType": "Patient" })]);
    let unknown = transform_bundle_value(&patient_only, &heuristic_config());
    assert!(matches!(unknown, Err(DigestError::UnknownBundleType)));
}

#[test]
fn injected_profiles_drive_classification() {
    let input = bundle(vec![json!({
        "resourceType": "Composition",
        "meta": { "profile": ["urn:clinic:discharge"] }
    })]);
    let config = TransformConfig {
        profiles: ProfileRegistry::empty()
            .with_profile("urn:clinic:discharge", BundleType::DischargeSummaryRecord),
        ..TransformConfig::default()
    };

    let transformed = transform_bundle_value(&input, &config).unwrap();
    assert_eq!(transformed.bundle_type, BundleType::DischargeSummaryRecord);
}

#[test]
fn extraction_composes_with_transformation() {
    let input = bundle(vec![json!({
        "resourceType": "DocumentReference",
        "description": "Scan",
        "content": [{ "attachment": { "contentType": "image/png", "data": "iVBORw0K" } }]
    })]);

    let mut next = 0;
    let extracted = extract_attachments_with(&input, || {
        next += 1;
        format!("att-{next}")
    });
    assert_eq!(extracted.attachments.len(), 1);
    assert_eq!(
        extracted.bundle["entry"][0]["resource"]["content"][0]["attachment"]["extension"][0],
        json!({ "url": ATTACHMENT_REF_URL, "valueString": "att-1" })
    );

    let lightened = transform_bundle_value(&extracted.bundle, &TransformConfig::default()).unwrap();
    let unhandled = lightened.group(ProcessedKind::Unhandled);
    assert_eq!(
        unhandled.to_vec(),
        vec![ProcessedResource::unhandled(
            "DocumentReference",
            Some("No attachment data/url in DocumentReference".to_string())
        )]
    );

    let original = transform_bundle_value(&input, &TransformConfig::default()).unwrap();
    assert_eq!(original.count(ProcessedKind::Attachment), 1);
}
