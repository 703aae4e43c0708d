//! Core data model for normalized clinical bundles.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod records;

pub use config::{ClassificationPolicy, PayloadPolicy, ProfileRegistry, TransformConfig};
pub use records::*;

/// Placeholder written instead of attachment bytes when payloads are withheld.
pub const WITHHELD_PAYLOAD: &str = "base64PDFDATA";

/// Semantic type of a whole bundle.
///
/// The named variants are the record-level document types. [`BundleType::Resource`] carries the
/// anchor's own `resourceType` when no profile identifies the bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", from = "String")]
pub enum BundleType {
    WellnessRecord,
    PrescriptionRecord,
    DischargeSummaryRecord,
    ImmunizationRecord,
    OPConsultRecord,
    InvoiceRecord,
    HealthDocumentRecord,
    DiagnosticReportRecord,
    Resource(String),
}

impl BundleType {
    pub const RECORDS: [BundleType; 8] = [
        BundleType::WellnessRecord,
        BundleType::PrescriptionRecord,
        BundleType::DischargeSummaryRecord,
        BundleType::ImmunizationRecord,
        BundleType::OPConsultRecord,
        BundleType::InvoiceRecord,
        BundleType::HealthDocumentRecord,
        BundleType::DiagnosticReportRecord,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::WellnessRecord => "WellnessRecord",
            Self::PrescriptionRecord => "PrescriptionRecord",
            Self::DischargeSummaryRecord => "DischargeSummaryRecord",
            Self::ImmunizationRecord => "ImmunizationRecord",
            Self::OPConsultRecord => "OPConsultRecord",
            Self::InvoiceRecord => "InvoiceRecord",
            Self::HealthDocumentRecord => "HealthDocumentRecord",
            Self::DiagnosticReportRecord => "DiagnosticReportRecord",
            Self::Resource(tag) => tag,
        }
    }

    /// True for tags under which a report's presented form may stand in for attachments.
    pub fn is_diagnostic_report(&self) -> bool {
        match self {
            Self::DiagnosticReportRecord => true,
            Self::Resource(tag) => tag == "DiagnosticReport",
            _ => false,
        }
    }
}

impl From<String> for BundleType {
    fn from(tag: String) -> Self {
        Self::RECORDS
            .into_iter()
            .find(|record| record.as_str() == tag)
            .unwrap_or(Self::Resource(tag))
    }
}

impl From<&str> for BundleType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<BundleType> for String {
    fn from(bundle_type: BundleType) -> Self {
        match bundle_type {
            BundleType::Resource(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for BundleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result: normalized resources grouped by kind plus the bundle classification.
///
/// Each group keeps source entry order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformedBundle {
    pub id: String,
    pub bundle_type: BundleType,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub resources: BTreeMap<ProcessedKind, Vec<ProcessedResource>>,
}

impl TransformedBundle {
    pub fn new(
        id: String,
        bundle_type: BundleType,
        resources: BTreeMap<ProcessedKind, Vec<ProcessedResource>>,
    ) -> Self {
        Self {
            id,
            bundle_type,
            generated_at: Utc::now(),
            resources,
        }
    }

    /// Records of one kind, empty when the kind never occurred.
    pub fn group(&self, kind: ProcessedKind) -> &[ProcessedResource] {
        self.resources
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn count(&self, kind: ProcessedKind) -> usize {
        self.group(kind).len()
    }

    /// Number of records across every group.
    pub fn total(&self) -> usize {
        self.resources.values().map(Vec::len).sum()
    }
}

/// Call-level failures. Per-resource problems never surface here.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("input is missing or carries no bundle entries")]
    MissingData,
    #[error("bundle has no entry carrying a resource")]
    MissingAnchor,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown bundle type")]
    UnknownBundleType,
    #[error("could not read input: {0}")]
    Parse(String),
}

impl DigestError {
    /// Structural problems with the input itself, as opposed to classification misses.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingData | Self::MissingAnchor | Self::InvalidInput(_) | Self::Parse(_)
        )
    }
}

pub type DigestResult<T> = Result<T, DigestError>;
