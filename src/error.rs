//! Error taxonomy for the registration flow.
//!
//! Validation errors stay local to a step, upload errors are scoped to a
//! document slot, and submission errors cover the whole network round trip.
use crate::registration::{FieldErrors, StepId};
use thiserror::Error;

/// Local, per-field failures for one wizard step. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} step has invalid fields: {}", field_list(.fields))]
pub struct ValidationError {
    pub step: StepId,
    pub fields: FieldErrors,
}

impl ValidationError {
    pub fn new(step: StepId, fields: FieldErrors) -> Self {
        Self { step, fields }
    }

    /// Message attached to `field`, if that field failed.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

fn field_list(fields: &FieldErrors) -> String {
    fields.keys().copied().collect::<Vec<_>>().join(", ")
}

/// A document was rejected, either before upload or by the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("File size must be less than 5MB")]
    TooLarge { size: u64 },
    #[error("File must be PDF, JPEG, JPG, or PNG")]
    UnsupportedType { content_type: String },
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("upload response did not include a file path")]
    MissingPath,
    #[error("upload request failed: {0}")]
    Transport(String),
}

/// The registration could not be submitted. The draft is left intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("document upload failed: {0}")]
    Upload(#[from] UploadError),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("registration request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Incomplete(#[from] ValidationError),
    #[error("registration can only be submitted from the review step")]
    NotOnReviewStep,
    #[error("registration was already submitted")]
    AlreadySubmitted,
}

impl SubmissionError {
    /// HTTP status reported by the backend, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Upload(UploadError::Rejected { status, .. })
            | SubmissionError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn validation_error_lists_failed_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("email", "Please enter a valid email address".to_string());
        fields.insert("address", "Please provide a complete address".to_string());
        let err = ValidationError::new(StepId::Contact, fields);
        assert_eq!(
            err.to_string(),
            "contact step has invalid fields: address, email"
        );
        assert_eq!(
            err.message("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn upload_rejection_surfaces_through_submission_error() {
        let err = SubmissionError::from(UploadError::Rejected {
            status: 500,
            message: "storage offline".to_string(),
        });
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "document upload failed: storage offline");
    }
}
