//! Step forms for the registration wizard.
//!
//! A form holds the raw input values of one step, validates only its own
//! fields, and turns into a [`StepData`] slice once valid.
mod business;
mod contact;
mod documents;
mod payment;
mod review;

pub use business::BusinessForm;
pub use contact::ContactForm;
pub use documents::{
    content_type_for_path, validate_attachment, Attachment, DocumentKind, DocumentSet,
    DocumentsForm, FilePreview, ACCEPTED_CONTENT_TYPES, MAX_FILE_SIZE,
};
pub use payment::{PaymentForm, PaymentSection};
pub use review::{review_sections, ReviewForm, ReviewRow, ReviewSection, TermsAcceptance};

use super::{FieldErrors, StepData, StepId};
use crate::error::ValidationError;

/// Enabled state of the step's navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub back_enabled: bool,
    pub next_enabled: bool,
}

/// Shared contract for every step form.
pub trait StepForm {
    const STEP: StepId;

    /// Validate this step's fields only. Empty when valid.
    fn validate(&self) -> FieldErrors;

    /// The slice this step contributes to the draft.
    fn step_data(&self) -> StepData;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validate and emit the slice, or report every failing field.
    fn submit(&self) -> Result<StepData, ValidationError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ValidationError::new(Self::STEP, errors));
        }
        Ok(self.step_data())
    }

    fn controls(&self) -> NavControls {
        NavControls {
            back_enabled: Self::STEP != StepId::FIRST,
            next_enabled: self.is_valid(),
        }
    }
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn require_min_chars(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) {
    if char_len(value) < min {
        errors.insert(field, message.to_string());
    }
}

fn require_present(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    require_min_chars(errors, field, value, 1, message);
}
