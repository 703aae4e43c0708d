//! Flat records produced by the resource normalizer.
//!
//! Every record is already resolved: strings, numbers and ordered lists only. Text fields default
//! to the empty string; `Option` is reserved for fields that may legitimately be absent and those
//! are skipped on serialization.

use serde::{Deserialize, Serialize};

/// Discriminant of a [`ProcessedResource`]. Also the grouping key of a transformed bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessedKind {
    Attachment,
    PatientInfo,
    PractitionerInfo,
    OrganizationInfo,
    ObservationResult,
    MedicationInfo,
    Medication,
    ConditionInfo,
    ProcedureInfo,
    EncounterInfo,
    ImmunizationInfo,
    ImmunizationRecommendationInfo,
    AllergyIntoleranceInfo,
    CompositionInfo,
    DiagnosticReportInfo,
    AppointmentInfo,
    CarePlanInfo,
    MedicationStatementInfo,
    SpecimenInfo,
    ServiceRequestInfo,
    ChargeItemInfo,
    InvoiceInfo,
    GoalInfo,
    Unhandled,
}

impl ProcessedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "Attachment",
            Self::PatientInfo => "PatientInfo",
            Self::PractitionerInfo => "PractitionerInfo",
            Self::OrganizationInfo => "OrganizationInfo",
            Self::ObservationResult => "ObservationResult",
            Self::MedicationInfo => "MedicationInfo",
            Self::Medication => "Medication",
            Self::ConditionInfo => "ConditionInfo",
            Self::ProcedureInfo => "ProcedureInfo",
            Self::EncounterInfo => "EncounterInfo",
            Self::ImmunizationInfo => "ImmunizationInfo",
            Self::ImmunizationRecommendationInfo => "ImmunizationRecommendationInfo",
            Self::AllergyIntoleranceInfo => "AllergyIntoleranceInfo",
            Self::CompositionInfo => "CompositionInfo",
            Self::DiagnosticReportInfo => "DiagnosticReportInfo",
            Self::AppointmentInfo => "AppointmentInfo",
            Self::CarePlanInfo => "CarePlanInfo",
            Self::MedicationStatementInfo => "MedicationStatementInfo",
            Self::SpecimenInfo => "SpecimenInfo",
            Self::ServiceRequestInfo => "ServiceRequestInfo",
            Self::ChargeItemInfo => "ChargeItemInfo",
            Self::InvoiceInfo => "InvoiceInfo",
            Self::GoalInfo => "GoalInfo",
            Self::Unhandled => "Unhandled",
        }
    }
}

/// One normalized resource, tagged by `processedType` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "processedType")]
pub enum ProcessedResource {
    Attachment(AttachmentInfo),
    PatientInfo(PatientInfo),
    PractitionerInfo(PractitionerInfo),
    OrganizationInfo(OrganizationInfo),
    ObservationResult(ObservationResult),
    MedicationInfo(MedicationInfo),
    Medication(MedicationProduct),
    ConditionInfo(ConditionInfo),
    ProcedureInfo(ProcedureInfo),
    EncounterInfo(EncounterInfo),
    ImmunizationInfo(ImmunizationInfo),
    ImmunizationRecommendationInfo(ImmunizationRecommendationInfo),
    AllergyIntoleranceInfo(AllergyIntoleranceInfo),
    CompositionInfo(CompositionInfo),
    DiagnosticReportInfo(DiagnosticReportInfo),
    AppointmentInfo(AppointmentInfo),
    CarePlanInfo(CarePlanInfo),
    MedicationStatementInfo(MedicationStatementInfo),
    SpecimenInfo(SpecimenInfo),
    ServiceRequestInfo(ServiceRequestInfo),
    ChargeItemInfo(ChargeItemInfo),
    InvoiceInfo(InvoiceInfo),
    GoalInfo(GoalInfo),
    Unhandled(UnhandledResource),
}

impl ProcessedResource {
    pub fn kind(&self) -> ProcessedKind {
        match self {
            Self::Attachment(_) => ProcessedKind::Attachment,
            Self::PatientInfo(_) => ProcessedKind::PatientInfo,
            Self::PractitionerInfo(_) => ProcessedKind::PractitionerInfo,
            Self::OrganizationInfo(_) => ProcessedKind::OrganizationInfo,
            Self::ObservationResult(_) => ProcessedKind::ObservationResult,
            Self::MedicationInfo(_) => ProcessedKind::MedicationInfo,
            Self::Medication(_) => ProcessedKind::Medication,
            Self::ConditionInfo(_) => ProcessedKind::ConditionInfo,
            Self::ProcedureInfo(_) => ProcessedKind::ProcedureInfo,
            Self::EncounterInfo(_) => ProcessedKind::EncounterInfo,
            Self::ImmunizationInfo(_) => ProcessedKind::ImmunizationInfo,
            Self::ImmunizationRecommendationInfo(_) => {
                ProcessedKind::ImmunizationRecommendationInfo
            }
            Self::AllergyIntoleranceInfo(_) => ProcessedKind::AllergyIntoleranceInfo,
            Self::CompositionInfo(_) => ProcessedKind::CompositionInfo,
            Self::DiagnosticReportInfo(_) => ProcessedKind::DiagnosticReportInfo,
            Self::AppointmentInfo(_) => ProcessedKind::AppointmentInfo,
            Self::CarePlanInfo(_) => ProcessedKind::CarePlanInfo,
            Self::MedicationStatementInfo(_) => ProcessedKind::MedicationStatementInfo,
            Self::SpecimenInfo(_) => ProcessedKind::SpecimenInfo,
            Self::ServiceRequestInfo(_) => ProcessedKind::ServiceRequestInfo,
            Self::ChargeItemInfo(_) => ProcessedKind::ChargeItemInfo,
            Self::InvoiceInfo(_) => ProcessedKind::InvoiceInfo,
            Self::GoalInfo(_) => ProcessedKind::GoalInfo,
            Self::Unhandled(_) => ProcessedKind::Unhandled,
        }
    }

    /// Shorthand for the non-fatal "could not normalize" outcome.
    pub fn unhandled(original_resource_type: impl Into<String>, detail: Option<String>) -> Self {
        Self::Unhandled(UnhandledResource {
            original_resource_type: original_resource_type.into(),
            detail,
        })
    }
}

/// Binary content surfaced from DocumentReference, Binary or a report's presented form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub content_type: String,
    /// Raw payload, or a placeholder when payloads are withheld.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub name: String,
    pub id: String,
    pub gender: String,
    pub birth_date: String,
    #[serde(default)]
    pub telecom: Vec<String>,
    #[serde(default)]
    pub address: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerInfo {
    pub name: String,
    pub id: String,
    pub gender: String,
    #[serde(default)]
    pub identifier: Vec<IdentifierInfo>,
    #[serde(default)]
    pub telecom: Vec<String>,
    #[serde(default)]
    pub qualification: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Identifier flattened to its type text and value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentifierInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub identifier: Vec<IdentifierInfo>,
    #[serde(rename = "type", default)]
    pub kind: Vec<String>,
    #[serde(default)]
    pub telecom: Vec<String>,
    #[serde(default)]
    pub address: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResult {
    pub code: String,
    pub value: String,
    pub unit: String,
    pub date: String,
    pub text: String,
    pub status: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub interpretation: Vec<String>,
    #[serde(default)]
    pub reference_range: Vec<String>,
    #[serde(default)]
    pub components: Vec<ObservationComponent>,
}

/// Sub-measurement of an observation, resolved with the same value rules as its parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    pub code: String,
    pub value: String,
    pub unit: String,
    pub text: String,
    #[serde(default)]
    pub interpretation: Vec<String>,
    #[serde(default)]
    pub reference_range: Vec<String>,
}

/// A prescription line (MedicationRequest).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInfo {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: String,
    pub status: String,
    pub intent: String,
    pub authored_on: String,
    #[serde(default)]
    pub reason: Vec<String>,
}

/// A Medication product definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationProduct {
    pub name: String,
    pub form: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<MedicationBatch>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionInfo {
    pub code: String,
    pub status: String,
    pub text: String,
    pub verification_status: String,
    pub severity: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<String>,
    #[serde(default)]
    pub note: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureInfo {
    pub code: String,
    pub status: String,
    pub date: String,
    pub text: String,
    pub outcome: String,
    #[serde(default)]
    pub body_site: Vec<String>,
    #[serde(default)]
    pub reason: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub class: String,
    pub start_date: String,
    pub end_date: String,
    pub date: String,
    pub status: String,
    #[serde(default)]
    pub reason: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationInfo {
    pub vaccine: String,
    pub date: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_quantity: Option<String>,
    pub route: String,
    pub site: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImmunizationRecommendationInfo {
    pub vaccine: String,
    pub status: String,
    pub date: String,
    pub target_disease: String,
    pub dose_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllergyIntoleranceInfo {
    pub substance: String,
    pub severity: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub criticality: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset: Option<String>,
    #[serde(default)]
    pub reactions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub sections: Vec<CompositionSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSection {
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReportInfo {
    pub test: String,
    pub conclusion: String,
    pub date: String,
    pub status: String,
    pub issued: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub performers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInfo {
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_duration: Option<i64>,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarePlanInfo {
    pub status: String,
    pub intent: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub activities: Vec<CarePlanActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarePlanActivity {
    pub code: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationStatementInfo {
    pub status: String,
    pub medication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_asserted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<String>,
    pub dosage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestInfo {
    pub status: String,
    pub intent: String,
    pub code: String,
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargeItemInfo {
    pub status: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_override: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInfo {
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_net: Option<MoneyAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_gross: Option<MoneyAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoneyAmount {
    pub value: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalInfo {
    pub description: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
}

/// Terminal state for unknown kinds and payload-less documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnhandledResource {
    pub original_resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
