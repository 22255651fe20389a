use super::{DocumentKind, FieldErrors, StepData, StepForm, StepId};
use crate::registration::options::{
    label_or_value, PaymentChannel, BUSINESS_CATEGORIES, BUSINESS_TYPES, DELIVERY_METHODS,
};
use crate::registration::RegistrationDraft;
use crate::util::format_file_size;
use serde::{Deserialize, Serialize};

/// The two acceptance checkboxes of the final step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermsAcceptance {
    pub terms_and_condition: bool,
    pub return_policy: bool,
}

impl TermsAcceptance {
    pub fn accepted() -> Self {
        Self {
            terms_and_condition: true,
            return_policy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

/// Read-only summary of one earlier step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub title: &'static str,
    /// Step the section's Edit action jumps back to.
    pub edit_step: StepId,
    pub rows: Vec<ReviewRow>,
}

#[derive(Default)]
struct Rows(Vec<ReviewRow>);

impl Rows {
    // Blank values are left out of the summary.
    fn push(&mut self, label: &'static str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.0.push(ReviewRow {
                label,
                value: value.to_string(),
            });
        }
    }
}

/// Summarize every completed data step, in step order.
pub fn review_sections(draft: &RegistrationDraft) -> Vec<ReviewSection> {
    let mut sections = Vec::new();

    if let Some(contact) = &draft.contact {
        let mut rows = Rows::default();
        rows.push("Merchant Name", &contact.merchant_name);
        rows.push("Email", &contact.email);
        rows.push("Phone", &contact.phone);
        rows.push("Address", &contact.address);
        rows.push("Social Media", &contact.social_media);
        sections.push(ReviewSection {
            title: "Contact Information",
            edit_step: StepId::Contact,
            rows: rows.0,
        });
    }

    if let Some(business) = &draft.business {
        let mut rows = Rows::default();
        rows.push("Business Name", &business.business_name);
        rows.push(
            "Business Type",
            label_or_value(BUSINESS_TYPES, &business.business_type),
        );
        rows.push("Registration No.", &business.business_registration_no);
        rows.push("KRA PIN", &business.kra_pin);
        rows.push(
            "Business Category",
            label_or_value(BUSINESS_CATEGORIES, &business.business_category),
        );
        rows.push(
            "Delivery Method",
            label_or_value(DELIVERY_METHODS, &business.delivery_method),
        );
        rows.push("Business Nature", &business.business_nature);
        sections.push(ReviewSection {
            title: "Business Information",
            edit_step: StepId::Business,
            rows: rows.0,
        });
    }

    if let Some(payment) = &draft.payment {
        let mut rows = Rows::default();
        let channels = payment
            .preferred_payment_channel
            .iter()
            .map(PaymentChannel::label)
            .collect::<Vec<_>>()
            .join(", ");
        rows.push("Payment Channels", &channels);
        if payment.is_selected(PaymentChannel::Bank) {
            rows.push("Bank Name", &payment.bank_name);
            rows.push("Account Number", &payment.bank_account_no);
            rows.push("Account Name", &payment.bank_account_name);
        }
        if payment.is_selected(PaymentChannel::Mpesa) {
            rows.push("M-Pesa Paybill", &payment.mpesa_paybill);
            rows.push("M-Pesa Till", &payment.mpesa_till_number);
        }
        sections.push(ReviewSection {
            title: "Payment Information",
            edit_step: StepId::Payment,
            rows: rows.0,
        });
    }

    if let Some(documents) = &draft.documents {
        let mut rows = Rows::default();
        for kind in DocumentKind::ALL {
            let status = match documents.get(kind) {
                Some(file) => format!(
                    "Uploaded ({}, {})",
                    file.name,
                    format_file_size(file.size())
                ),
                None => "Not uploaded".to_string(),
            };
            rows.push(kind.title(), &status);
        }
        sections.push(ReviewSection {
            title: "Documents",
            edit_step: StepId::Documents,
            rows: rows.0,
        });
    }

    sections
}

/// Step 5: summary of the draft plus the acceptance checkboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub acceptance: TermsAcceptance,
    pub sections: Vec<ReviewSection>,
}

impl ReviewForm {
    pub fn from_draft(draft: &RegistrationDraft) -> Self {
        Self {
            acceptance: draft.terms.unwrap_or_default(),
            sections: review_sections(draft),
        }
    }

    pub fn section(&self, step: StepId) -> Option<&ReviewSection> {
        self.sections.iter().find(|section| section.edit_step == step)
    }
}

impl StepForm for ReviewForm {
    const STEP: StepId = StepId::Review;

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.acceptance.terms_and_condition {
            errors.insert(
                "termsAndCondition",
                "You must accept the terms and conditions".to_string(),
            );
        }
        if !self.acceptance.return_policy {
            errors.insert("returnPolicy", "You must accept the return policy".to_string());
        }
        errors
    }

    fn step_data(&self) -> StepData {
        StepData::Terms(self.acceptance)
    }
}
