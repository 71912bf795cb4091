//! Checklist module - document requirements extracted from a bidding notice

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a document is required to take part in the bidding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExigenceStatus {
    /// The bidder must present the document
    #[serde(rename = "OBRIGATORIO")]
    Mandatory,

    /// The document is optional
    #[serde(rename = "OPCIONAL")]
    Optional,
}

impl ExigenceStatus {
    /// Wire label used by the model contract and the bidding API
    pub fn as_str(&self) -> &'static str {
        match self {
            ExigenceStatus::Mandatory => "OBRIGATORIO",
            ExigenceStatus::Optional => "OPCIONAL",
        }
    }

    /// Classify a free-form status label
    ///
    /// Only `OBRIGATORIO` and `MANDATORY` (ignoring case and surrounding
    /// whitespace) are mandatory. Every other label, including unexpected
    /// ones, is optional.
    ///
    /// # Examples
    ///
    /// ```
    /// use edict_domain::ExigenceStatus;
    ///
    /// assert_eq!(ExigenceStatus::from_label("OBRIGATORIO"), ExigenceStatus::Mandatory);
    /// assert_eq!(ExigenceStatus::from_label(" mandatory "), ExigenceStatus::Mandatory);
    /// assert_eq!(ExigenceStatus::from_label("DESEJAVEL"), ExigenceStatus::Optional);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("OBRIGATORIO") || label.eq_ignore_ascii_case("MANDATORY") {
            ExigenceStatus::Mandatory
        } else {
            ExigenceStatus::Optional
        }
    }
}

impl Default for ExigenceStatus {
    fn default() -> Self {
        ExigenceStatus::Optional
    }
}

impl fmt::Display for ExigenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single document the bidder has to provide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequirement {
    /// Document name as written in the notice
    pub name: String,

    /// Mandatory or optional
    pub exigence_status: ExigenceStatus,

    /// Free-text notes (validity, issuing body, ...)
    pub additional_info: String,

    /// Whether the document can be attached digitally
    pub possible_to_attach: bool,
}

impl DocumentRequirement {
    /// Create a requirement with no additional info that can be attached
    pub fn new(name: impl Into<String>, exigence_status: ExigenceStatus) -> Self {
        Self {
            name: name.into(),
            exigence_status,
            additional_info: String::new(),
            possible_to_attach: true,
        }
    }

    /// Set the additional info
    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = info.into();
        self
    }

    /// Set whether the document can be attached
    pub fn with_possible_to_attach(mut self, possible: bool) -> Self {
        self.possible_to_attach = possible;
        self
    }

    /// Check if the requirement is mandatory
    pub fn is_mandatory(&self) -> bool {
        self.exigence_status == ExigenceStatus::Mandatory
    }
}

/// Result of a checklist extraction
///
/// Either a populated checklist or a soft failure
/// (`processing_error == true`). For a populated checklist
/// `total_documents == documents.len() == mandatory_count + optional_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistResult {
    /// Requirements in the order the model listed them
    pub documents: Vec<DocumentRequirement>,

    /// Number of documents
    pub total_documents: usize,

    /// Number of mandatory documents
    pub mandatory_count: usize,

    /// Number of optional documents
    pub optional_count: usize,

    /// Set when the inference step failed softly
    pub processing_error: bool,

    /// Reason for the soft failure
    pub error_message: Option<String>,
}

impl ChecklistResult {
    /// Build a checklist from parsed documents, computing the counts
    ///
    /// # Examples
    ///
    /// ```
    /// use edict_domain::{ChecklistResult, DocumentRequirement, ExigenceStatus};
    ///
    /// let result = ChecklistResult::from_documents(vec![
    ///     DocumentRequirement::new("Certidão", ExigenceStatus::Mandatory),
    ///     DocumentRequirement::new("Atestado", ExigenceStatus::Optional),
    /// ]);
    /// assert_eq!(result.total_documents, 2);
    /// assert_eq!(result.mandatory_count, 1);
    /// assert_eq!(result.optional_count, 1);
    /// ```
    pub fn from_documents(documents: Vec<DocumentRequirement>) -> Self {
        let total_documents = documents.len();
        let mandatory_count = documents.iter().filter(|d| d.is_mandatory()).count();

        Self {
            documents,
            total_documents,
            mandatory_count,
            optional_count: total_documents - mandatory_count,
            processing_error: false,
            error_message: None,
        }
    }

    /// Build a soft failure result
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            total_documents: 0,
            mandatory_count: 0,
            optional_count: 0,
            processing_error: true,
            error_message: Some(message.into()),
        }
    }

    /// Check the count invariant
    pub fn is_consistent(&self) -> bool {
        self.total_documents == self.documents.len()
            && self.mandatory_count + self.optional_count == self.total_documents
    }

    /// Convert to the wire shape expected by the bidding API
    pub fn to_payload(&self) -> ChecklistPayload {
        ChecklistPayload {
            checklist_items: self.documents.clone(),
        }
    }
}

/// Body of the checklist partial update: `{"checklistItems": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistPayload {
    /// Items in report order
    pub checklist_items: Vec<DocumentRequirement>,
}

impl ChecklistPayload {
    /// Number of items in the payload
    pub fn len(&self) -> usize {
        self.checklist_items.len()
    }

    /// Check if the payload carries no items
    pub fn is_empty(&self) -> bool {
        self.checklist_items.is_empty()
    }
}
