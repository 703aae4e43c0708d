//! Resource normalizer: one pure mapping per supported resource kind.

use digest_core::{
    AllergyIntoleranceInfo, AppointmentInfo, AttachmentInfo, CarePlanActivity, CarePlanInfo,
    ChargeItemInfo, CompositionInfo, CompositionSection, ConditionInfo, DiagnosticReportInfo,
    EncounterInfo, GoalInfo, ImmunizationInfo, ImmunizationRecommendationInfo, InvoiceInfo,
    MedicationBatch, MedicationInfo, MedicationProduct, MedicationStatementInfo, MoneyAmount,
    ObservationComponent, ObservationResult, OrganizationInfo, PatientInfo, PayloadPolicy,
    PractitionerInfo, ProcedureInfo, ProcessedKind, ProcessedResource, ServiceRequestInfo,
    SpecimenInfo,
};
use serde_json::Value;
use tracing::debug;

use crate::fields::{
    address_lines, codeable_text, codeable_texts, first_codeable_text,
    first_identifier, first_non_empty, format_money, format_quantity, format_ratio, format_timing,
    identifiers, notes, opt_text, person_name, reference_display, reference_list,
    reference_ranges, resolve_value, string_list, telecom_lines, text, COLLECTED, DOSE_NUMBER, DUE,
    EFFECTIVE, MEDICATION, OCCURRENCE, ONSET, PERFORMED, PRODUCT, SCHEDULED, START,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const REPORT_CONTENT_TYPE: &str = "application/pdf";

/// Resource kinds with a dedicated normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Patient,
    Practitioner,
    Organization,
    Observation,
    MedicationRequest,
    Medication,
    Condition,
    Procedure,
    Encounter,
    Immunization,
    ImmunizationRecommendation,
    AllergyIntolerance,
    DocumentReference,
    Binary,
    Composition,
    DiagnosticReport,
    Appointment,
    CarePlan,
    MedicationStatement,
    Specimen,
    ServiceRequest,
    ChargeItem,
    Invoice,
    Goal,
}

impl SourceKind {
    pub const ALL: [SourceKind; 24] = [
        SourceKind::Patient,
        SourceKind::Practitioner,
        SourceKind::Organization,
        SourceKind::Observation,
        SourceKind::MedicationRequest,
        SourceKind::Medication,
        SourceKind::Condition,
        SourceKind::Procedure,
        SourceKind::Encounter,
        SourceKind::Immunization,
        SourceKind::ImmunizationRecommendation,
        SourceKind::AllergyIntolerance,
        SourceKind::DocumentReference,
        SourceKind::Binary,
        SourceKind::Composition,
        SourceKind::DiagnosticReport,
        SourceKind::Appointment,
        SourceKind::CarePlan,
        SourceKind::MedicationStatement,
        SourceKind::Specimen,
        SourceKind::ServiceRequest,
        SourceKind::ChargeItem,
        SourceKind::Invoice,
        SourceKind::Goal,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Practitioner => "Practitioner",
            Self::Organization => "Organization",
            Self::Observation => "Observation",
            Self::MedicationRequest => "MedicationRequest",
            Self::Medication => "Medication",
            Self::Condition => "Condition",
            Self::Procedure => "Procedure",
            Self::Encounter => "Encounter",
            Self::Immunization => "Immunization",
            Self::ImmunizationRecommendation => "ImmunizationRecommendation",
            Self::AllergyIntolerance => "AllergyIntolerance",
            Self::DocumentReference => "DocumentReference",
            Self::Binary => "Binary",
            Self::Composition => "Composition",
            Self::DiagnosticReport => "DiagnosticReport",
            Self::Appointment => "Appointment",
            Self::CarePlan => "CarePlan",
            Self::MedicationStatement => "MedicationStatement",
            Self::Specimen => "Specimen",
            Self::ServiceRequest => "ServiceRequest",
            Self::ChargeItem => "ChargeItem",
            Self::Invoice => "Invoice",
            Self::Goal => "Goal",
        }
    }

    /// Processed kind produced for a well-formed resource of this kind.
    pub fn designated_kind(&self) -> ProcessedKind {
        match self {
            Self::Patient => ProcessedKind::PatientInfo,
            Self::Practitioner => ProcessedKind::PractitionerInfo,
            Self::Organization => ProcessedKind::OrganizationInfo,
            Self::Observation => ProcessedKind::ObservationResult,
            Self::MedicationRequest => ProcessedKind::MedicationInfo,
            Self::Medication => ProcessedKind::Medication,
            Self::Condition => ProcessedKind::ConditionInfo,
            Self::Procedure => ProcessedKind::ProcedureInfo,
            Self::Encounter => ProcessedKind::EncounterInfo,
            Self::Immunization => ProcessedKind::ImmunizationInfo,
            Self::ImmunizationRecommendation => ProcessedKind::ImmunizationRecommendationInfo,
            Self::AllergyIntolerance => ProcessedKind::AllergyIntoleranceInfo,
            Self::DocumentReference | Self::Binary => ProcessedKind::Attachment,
            Self::Composition => ProcessedKind::CompositionInfo,
            Self::DiagnosticReport => ProcessedKind::DiagnosticReportInfo,
            Self::Appointment => ProcessedKind::AppointmentInfo,
            Self::CarePlan => ProcessedKind::CarePlanInfo,
            Self::MedicationStatement => ProcessedKind::MedicationStatementInfo,
            Self::Specimen => ProcessedKind::SpecimenInfo,
            Self::ServiceRequest => ProcessedKind::ServiceRequestInfo,
            Self::ChargeItem => ProcessedKind::ChargeItemInfo,
            Self::Invoice => ProcessedKind::InvoiceInfo,
            Self::Goal => ProcessedKind::GoalInfo,
        }
    }
}

/// Normalize one resource, withholding attachment payloads.
pub fn normalize(resource: Option<&Value>) -> ProcessedResource {
    normalize_with(resource, PayloadPolicy::default())
}

/// Normalize one resource. Never fails: absent, untagged or unknown input becomes `Unhandled`.
pub fn normalize_with(resource: Option<&Value>, payloads: PayloadPolicy) -> ProcessedResource {
    let Some(resource) = resource.filter(|resource| !resource.is_null()) else {
        return ProcessedResource::unhandled("Unknown (null or undefined resource)", None);
    };

    let Some(tag) = opt_text(resource, "resourceType") else {
        return ProcessedResource::unhandled("Unknown (missing resourceType)", None);
    };

    let Some(kind) = SourceKind::from_tag(&tag) else {
        debug!(resource_type = %tag, "no normalizer for resource type");
        return ProcessedResource::unhandled(tag, None);
    };

    match kind {
        SourceKind::Patient => patient(resource),
        SourceKind::Practitioner => practitioner(resource),
        SourceKind::Organization => organization(resource),
        SourceKind::Observation => observation(resource),
        SourceKind::MedicationRequest => medication_request(resource),
        SourceKind::Medication => medication(resource),
        SourceKind::Condition => condition(resource),
        SourceKind::Procedure => procedure(resource),
        SourceKind::Encounter => encounter(resource),
        SourceKind::Immunization => immunization(resource),
        SourceKind::ImmunizationRecommendation => immunization_recommendation(resource),
        SourceKind::AllergyIntolerance => allergy_intolerance(resource),
        SourceKind::DocumentReference => document_reference(resource, payloads),
        SourceKind::Binary => binary(resource, payloads),
        SourceKind::Composition => composition(resource),
        SourceKind::DiagnosticReport => diagnostic_report(resource),
        SourceKind::Appointment => appointment(resource),
        SourceKind::CarePlan => care_plan(resource),
        SourceKind::MedicationStatement => medication_statement(resource),
        SourceKind::Specimen => specimen(resource),
        SourceKind::ServiceRequest => service_request(resource),
        SourceKind::ChargeItem => charge_item(resource),
        SourceKind::Invoice => invoice(resource),
        SourceKind::Goal => goal(resource),
    }
}

fn or_default(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn patient(resource: &Value) -> ProcessedResource {
    ProcessedResource::PatientInfo(PatientInfo {
        name: person_name(resource.get("name")),
        id: or_default(text(resource, "id"), "Unknown ID"),
        gender: text(resource, "gender"),
        birth_date: text(resource, "birthDate"),
        telecom: telecom_lines(resource.get("telecom")),
        address: address_lines(resource.get("address")),
    })
}

fn practitioner(resource: &Value) -> ProcessedResource {
    let qualification = resource
        .get("qualification")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| codeable_text(item.get("code")))
                .filter(|code| !code.is_empty())
                .collect()
        })
        .unwrap_or_default();

    ProcessedResource::PractitionerInfo(PractitionerInfo {
        name: person_name(resource.get("name")),
        id: or_default(text(resource, "id"), "Unknown ID"),
        gender: text(resource, "gender"),
        identifier: identifiers(resource.get("identifier")),
        telecom: telecom_lines(resource.get("telecom")),
        qualification,
        active: resource.get("active").and_then(Value::as_bool),
    })
}

fn organization(resource: &Value) -> ProcessedResource {
    ProcessedResource::OrganizationInfo(OrganizationInfo {
        name: or_default(text(resource, "name"), "Unknown Organization"),
        id: opt_text(resource, "id"),
        identifier: identifiers(resource.get("identifier")),
        kind: codeable_texts(resource.get("type")),
        telecom: telecom_lines(resource.get("telecom")),
        address: address_lines(resource.get("address")),
        active: resource.get("active").and_then(Value::as_bool),
    })
}

fn observation(resource: &Value) -> ProcessedResource {
    let code = resource.get("code");
    let resolved = resolve_value(resource);

    let components = resource
        .get("component")
        .and_then(Value::as_array)
        .map(|components| components.iter().map(observation_component).collect())
        .unwrap_or_default();

    ProcessedResource::ObservationResult(ObservationResult {
        code: codeable_text(code),
        value: resolved.value,
        unit: resolved.unit,
        date: EFFECTIVE.timestamp(resource).unwrap_or_default(),
        text: codeable_text(code),
        status: text(resource, "status"),
        category: codeable_texts(resource.get("category")),
        interpretation: codeable_texts(resource.get("interpretation")),
        reference_range: reference_ranges(resource.get("referenceRange")),
        components,
    })
}

fn observation_component(component: &Value) -> ObservationComponent {
    let resolved = resolve_value(component);
    ObservationComponent {
        code: codeable_text(component.get("code")),
        value: resolved.value,
        unit: resolved.unit,
        text: codeable_text(component.get("code")),
        interpretation: codeable_texts(component.get("interpretation")),
        reference_range: reference_ranges(component.get("referenceRange")),
    }
}

fn medication_request(resource: &Value) -> ProcessedResource {
    let name = first_non_empty([
        codeable_text(resource.get("medicationCodeableConcept")),
        reference_display(resource.get("medicationReference")).unwrap_or_default(),
        "Unknown Medication".to_string(),
    ]);

    let instruction = resource
        .get("dosageInstruction")
        .and_then(Value::as_array)
        .and_then(|instructions| instructions.first());

    let dosage = instruction
        .map(|instruction| {
            first_non_empty([
                text(instruction, "text"),
                instruction
                    .get("doseAndRate")
                    .and_then(Value::as_array)
                    .and_then(|rates| rates.first())
                    .and_then(|rate| format_quantity(rate.get("doseQuantity")))
                    .unwrap_or_default(),
            ])
        })
        .unwrap_or_default();

    let frequency = instruction
        .and_then(|instruction| format_timing(instruction.get("timing")))
        .unwrap_or_default();

    let route = instruction
        .map(|instruction| codeable_text(instruction.get("route")))
        .unwrap_or_default();

    let dispense = resource.get("dispenseRequest");
    let duration = first_non_empty([
        dispense
            .and_then(|d| d.get("validityPeriod"))
            .map(|period| text(period, "end"))
            .unwrap_or_default(),
        dispense
            .and_then(|d| format_quantity(d.get("expectedSupplyDuration")))
            .unwrap_or_default(),
    ]);

    ProcessedResource::MedicationInfo(MedicationInfo {
        name,
        dosage,
        frequency,
        duration,
        route,
        status: text(resource, "status"),
        intent: text(resource, "intent"),
        authored_on: text(resource, "authoredOn"),
        reason: codeable_texts(resource.get("reasonCode")),
    })
}

fn medication(resource: &Value) -> ProcessedResource {
    let batch = resource.get("batch").map(|batch| MedicationBatch {
        lot_number: opt_text(batch, "lotNumber"),
        expiration_date: opt_text(batch, "expirationDate"),
    });

    let ingredients = resource
        .get("ingredient")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|ingredient| {
                    let item = first_non_empty([
                        codeable_text(ingredient.get("itemCodeableConcept")),
                        reference_display(ingredient.get("itemReference")).unwrap_or_default(),
                    ]);
                    if item.is_empty() {
                        return None;
                    }
                    Some(match format_ratio(ingredient.get("strength")) {
                        Some(strength) => format!("{item} ({strength})"),
                        None => item,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    ProcessedResource::Medication(MedicationProduct {
        name: or_default(codeable_text(resource.get("code")), "Unknown Medication"),
        form: codeable_text(resource.get("form")),
        status: text(resource, "status"),
        identifier: first_identifier(resource.get("identifier")),
        batch,
        ingredients,
    })
}

fn condition(resource: &Value) -> ProcessedResource {
    let clinical = codeable_text(resource.get("clinicalStatus"));
    let verification = codeable_text(resource.get("verificationStatus"));

    ProcessedResource::ConditionInfo(ConditionInfo {
        code: or_default(codeable_text(resource.get("code")), "Unknown Condition"),
        status: first_non_empty([clinical, verification.clone()]),
        text: codeable_text(resource.get("code")),
        verification_status: verification,
        severity: codeable_text(resource.get("severity")),
        category: codeable_texts(resource.get("category")),
        onset: ONSET.resolve_text(resource),
        recorded_date: opt_text(resource, "recordedDate"),
        note: notes(resource.get("note")),
    })
}

fn procedure(resource: &Value) -> ProcessedResource {
    ProcessedResource::ProcedureInfo(ProcedureInfo {
        code: or_default(codeable_text(resource.get("code")), "Unknown Procedure"),
        status: text(resource, "status"),
        date: PERFORMED.timestamp(resource).unwrap_or_default(),
        text: codeable_text(resource.get("code")),
        outcome: codeable_text(resource.get("outcome")),
        body_site: codeable_texts(resource.get("bodySite")),
        reason: codeable_texts(resource.get("reasonCode")),
    })
}

fn encounter(resource: &Value) -> ProcessedResource {
    let class = resource.get("class");
    let period = resource.get("period");
    let start = period.map(|p| text(p, "start")).unwrap_or_default();

    ProcessedResource::EncounterInfo(EncounterInfo {
        kind: first_non_empty([
            class.map(|c| text(c, "display")).unwrap_or_default(),
            class.map(|c| text(c, "code")).unwrap_or_default(),
            first_codeable_text(resource.get("type")),
            "Unknown Encounter Type".to_string(),
        ]),
        class: class.map(|c| text(c, "code")).unwrap_or_default(),
        start_date: start.clone(),
        end_date: period.map(|p| text(p, "end")).unwrap_or_default(),
        date: start,
        status: text(resource, "status"),
        reason: codeable_texts(resource.get("reasonCode")),
    })
}

fn immunization(resource: &Value) -> ProcessedResource {
    ProcessedResource::ImmunizationInfo(ImmunizationInfo {
        vaccine: or_default(codeable_text(resource.get("vaccineCode")), "Unknown Vaccine"),
        date: OCCURRENCE.timestamp(resource).unwrap_or_default(),
        status: text(resource, "status"),
        lot_number: opt_text(resource, "lotNumber"),
        dose_quantity: format_quantity(resource.get("doseQuantity")),
        route: codeable_text(resource.get("route")),
        site: codeable_text(resource.get("site")),
    })
}

fn immunization_recommendation(resource: &Value) -> ProcessedResource {
    let first = resource
        .get("recommendation")
        .and_then(Value::as_array)
        .and_then(|items| items.first());

    ProcessedResource::ImmunizationRecommendationInfo(ImmunizationRecommendationInfo {
        vaccine: or_default(
            first
                .map(|r| first_codeable_text(r.get("vaccineCode")))
                .unwrap_or_default(),
            "Unknown Vaccine",
        ),
        status: first
            .map(|r| codeable_text(r.get("forecastStatus")))
            .unwrap_or_default(),
        date: text(resource, "date"),
        target_disease: first
            .map(|r| codeable_text(r.get("targetDisease")))
            .unwrap_or_default(),
        dose_number: first
            .and_then(|r| DOSE_NUMBER.resolve_text(r))
            .unwrap_or_default(),
    })
}

fn allergy_intolerance(resource: &Value) -> ProcessedResource {
    let reactions = resource.get("reaction").and_then(Value::as_array);

    let severity = reactions
        .and_then(|items| items.first())
        .map(|reaction| text(reaction, "severity"))
        .unwrap_or_default();

    let manifestations = reactions
        .map(|items| {
            items
                .iter()
                .flat_map(|reaction| codeable_texts(reaction.get("manifestation")))
                .collect()
        })
        .unwrap_or_default();

    ProcessedResource::AllergyIntoleranceInfo(AllergyIntoleranceInfo {
        substance: or_default(codeable_text(resource.get("code")), "Unknown Substance"),
        severity,
        status: first_non_empty([
            codeable_text(resource.get("clinicalStatus")),
            codeable_text(resource.get("verificationStatus")),
        ]),
        kind: text(resource, "type"),
        criticality: text(resource, "criticality"),
        category: string_list(resource.get("category")),
        onset: ONSET.resolve_text(resource),
        reactions: manifestations,
    })
}

fn document_reference(resource: &Value, payloads: PayloadPolicy) -> ProcessedResource {
    let attachment = resource
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|content| content.get("attachment"))
        .find(|attachment| has_payload(attachment));

    let Some(attachment) = attachment else {
        return ProcessedResource::unhandled(
            SourceKind::DocumentReference.as_str(),
            Some("No attachment data/url in DocumentReference".to_string()),
        );
    };

    ProcessedResource::Attachment(AttachmentInfo {
        content_type: or_default(text(attachment, "contentType"), DEFAULT_CONTENT_TYPE),
        data: attachment_data(attachment, payloads),
        title: Some(first_non_empty([
            text(attachment, "title"),
            text(resource, "description"),
            "Document".to_string(),
        ])),
    })
}

fn binary(resource: &Value, payloads: PayloadPolicy) -> ProcessedResource {
    let Some(data) = opt_text(resource, "data") else {
        return ProcessedResource::unhandled(
            SourceKind::Binary.as_str(),
            Some("No data in Binary".to_string()),
        );
    };

    ProcessedResource::Attachment(AttachmentInfo {
        content_type: or_default(text(resource, "contentType"), DEFAULT_CONTENT_TYPE),
        data: payloads.render(&data),
        title: Some("Binary Document".to_string()),
    })
}

fn has_payload(attachment: &Value) -> bool {
    opt_text(attachment, "data").is_some() || opt_text(attachment, "url").is_some()
}

/// Inline data goes through the payload policy; a URL is a locator and is kept as is.
fn attachment_data(attachment: &Value, payloads: PayloadPolicy) -> String {
    match opt_text(attachment, "data") {
        Some(data) => payloads.render(&data),
        None => format!("URL: {}", text(attachment, "url")),
    }
}

/// Attachments embedded in a DiagnosticReport's `presentedForm`.
pub fn presented_form_attachments(report: &Value, payloads: PayloadPolicy) -> Vec<AttachmentInfo> {
    report
        .get("presentedForm")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|form| has_payload(form))
        .map(|form| AttachmentInfo {
            content_type: or_default(text(form, "contentType"), REPORT_CONTENT_TYPE),
            data: attachment_data(form, payloads),
            title: Some(or_default(text(form, "title"), "Diagnostic Report")),
        })
        .collect()
}

fn composition(resource: &Value) -> ProcessedResource {
    let sections = resource
        .get("section")
        .and_then(Value::as_array)
        .map(|sections| {
            sections
                .iter()
                .map(|section| CompositionSection {
                    title: text(section, "title"),
                    code: codeable_text(section.get("code")),
                    entries: reference_list(section.get("entry")),
                })
                .collect()
        })
        .unwrap_or_default();

    ProcessedResource::CompositionInfo(CompositionInfo {
        title: or_default(text(resource, "title"), "Untitled Document"),
        id: opt_text(resource, "id"),
        status: or_default(text(resource, "status"), "unknown"),
        kind: codeable_text(resource.get("type")),
        date: opt_text(resource, "date"),
        sections,
    })
}

fn diagnostic_report(resource: &Value) -> ProcessedResource {
    ProcessedResource::DiagnosticReportInfo(DiagnosticReportInfo {
        test: codeable_text(resource.get("code")),
        conclusion: text(resource, "conclusion"),
        date: EFFECTIVE.timestamp(resource).unwrap_or_default(),
        status: text(resource, "status"),
        issued: text(resource, "issued"),
        category: codeable_texts(resource.get("category")),
        results: reference_list(resource.get("result")),
        performers: reference_list(resource.get("performer")),
    })
}

fn appointment(resource: &Value) -> ProcessedResource {
    let participants = resource
        .get("participant")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|participant| reference_display(participant.get("actor")))
                .collect()
        })
        .unwrap_or_default();

    ProcessedResource::AppointmentInfo(AppointmentInfo {
        status: text(resource, "status"),
        kind: codeable_text(resource.get("appointmentType")),
        description: opt_text(resource, "description"),
        start: text(resource, "start"),
        end: text(resource, "end"),
        created: opt_text(resource, "created"),
        minutes_duration: resource.get("minutesDuration").and_then(Value::as_i64),
        participants,
    })
}

fn care_plan(resource: &Value) -> ProcessedResource {
    let activities = resource
        .get("activity")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(care_plan_activity).collect())
        .unwrap_or_default();

    ProcessedResource::CarePlanInfo(CarePlanInfo {
        status: text(resource, "status"),
        intent: text(resource, "intent"),
        title: text(resource, "title"),
        description: opt_text(resource, "description"),
        category: first_codeable_text(resource.get("category")),
        activities,
    })
}

fn care_plan_activity(activity: &Value) -> CarePlanActivity {
    let Some(detail) = activity.get("detail") else {
        return CarePlanActivity {
            code: reference_display(activity.get("reference")).unwrap_or_default(),
            status: String::new(),
            scheduled: None,
        };
    };

    CarePlanActivity {
        code: codeable_text(detail.get("code")),
        status: text(detail, "status"),
        scheduled: SCHEDULED.resolve_text(detail),
    }
}

fn medication_statement(resource: &Value) -> ProcessedResource {
    let dosage = resource
        .get("dosage")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .map(|dosage| text(dosage, "text"))
        .unwrap_or_default();

    ProcessedResource::MedicationStatementInfo(MedicationStatementInfo {
        status: text(resource, "status"),
        medication: MEDICATION.resolve_text(resource).unwrap_or_default(),
        date_asserted: opt_text(resource, "dateAsserted"),
        effective: EFFECTIVE.resolve_text(resource),
        dosage,
    })
}

fn specimen(resource: &Value) -> ProcessedResource {
    ProcessedResource::SpecimenInfo(SpecimenInfo {
        kind: codeable_text(resource.get("type")),
        status: text(resource, "status"),
        received_time: opt_text(resource, "receivedTime"),
        collection_time: resource
            .get("collection")
            .and_then(|collection| COLLECTED.timestamp(collection)),
    })
}

fn service_request(resource: &Value) -> ProcessedResource {
    ProcessedResource::ServiceRequestInfo(ServiceRequestInfo {
        status: text(resource, "status"),
        intent: text(resource, "intent"),
        code: codeable_text(resource.get("code")),
        priority: text(resource, "priority"),
        occurrence_date_time: OCCURRENCE.timestamp(resource),
        authored_on: opt_text(resource, "authoredOn"),
        requester: reference_display(resource.get("requester")),
    })
}

fn charge_item(resource: &Value) -> ProcessedResource {
    ProcessedResource::ChargeItemInfo(ChargeItemInfo {
        status: text(resource, "status"),
        code: codeable_text(resource.get("code")),
        quantity: resource
            .get("quantity")
            .and_then(|quantity| quantity.get("value"))
            .and_then(Value::as_f64),
        product: PRODUCT.resolve_text(resource),
        occurrence: OCCURRENCE.timestamp(resource),
        price_override: format_money(resource.get("priceOverride")),
    })
}

fn money_amount(money: Option<&Value>) -> Option<MoneyAmount> {
    let money = money?;
    Some(MoneyAmount {
        value: money.get("value").and_then(Value::as_f64).unwrap_or(0.0),
        currency: text(money, "currency"),
    })
}

fn invoice(resource: &Value) -> ProcessedResource {
    ProcessedResource::InvoiceInfo(InvoiceInfo {
        status: text(resource, "status"),
        kind: codeable_text(resource.get("type")),
        date: opt_text(resource, "date"),
        identifier: first_identifier(resource.get("identifier")),
        total_net: money_amount(resource.get("totalNet")),
        total_gross: money_amount(resource.get("totalGross")),
        payment_terms: opt_text(resource, "paymentTerms"),
    })
}

fn goal(resource: &Value) -> ProcessedResource {
    let target_date = resource
        .get("target")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(|target| DUE.timestamp(target));

    ProcessedResource::GoalInfo(GoalInfo {
        description: codeable_text(resource.get("description")),
        status: text(resource, "lifecycleStatus"),
        id: opt_text(resource, "id"),
        start_date: START.resolve_text(resource),
        target_date,
    })
}
