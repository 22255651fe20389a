//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use quickcrate_onboard::error::{SubmissionError, UploadError};
use quickcrate_onboard::gateway::MerchantApi;
use quickcrate_onboard::registration::{
    Attachment, BusinessForm, ContactForm, DocumentKind, DocumentSet, MerchantRegistration,
    PaymentChannel, PaymentForm, StepData, StepId,
};
use quickcrate_onboard::RegistrationWizard;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Flat answers covering every step, as the CLI reads them.
pub fn valid_answers() -> Value {
    json!({
        "merchantName": "Jane Wanjiru",
        "email": "jane@wanjiru.co.ke",
        "phone": "+254 700 123 456",
        "address": "12 Moi Avenue, Nairobi",
        "socialMedia": "@wanjiru_electronics",
        "businessName": "Wanjiru Electronics",
        "businessType": "retail",
        "businessRegistrationNo": "BN-2024-001",
        "kraPin": "A123456789B",
        "businessNature": "Consumer electronics and repairs",
        "businessCategory": "electronics",
        "deliveryMethod": "both",
        "preferredPaymentChannel": ["bank", "mpesa"],
        "bankName": "KCB Bank",
        "bankAccountNo": "1234567890",
        "bankAccountName": "Wanjiru Electronics Ltd",
        "mpesaPaybill": "400200",
        "termsAndCondition": true,
        "returnPolicy": true
    })
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value).expect("serialize fixture");
    std::fs::write(&path, text).expect("write fixture");
    path
}

pub fn contact() -> ContactForm {
    serde_json::from_value(valid_answers()).expect("contact fixture")
}

pub fn business() -> BusinessForm {
    serde_json::from_value(valid_answers()).expect("business fixture")
}

pub fn payment() -> PaymentForm {
    PaymentForm {
        preferred_payment_channel: vec![PaymentChannel::Mpesa],
        mpesa_till_number: "987654".to_string(),
        ..PaymentForm::default()
    }
}

pub fn pdf(name: &str) -> Attachment {
    Attachment::new(name, "application/pdf", b"%PDF-1.4 test".to_vec())
}

/// Feed every data step and stop on review.
pub fn walk_to_review(wizard: &mut RegistrationWizard, documents: DocumentSet) {
    wizard.advance(StepData::Contact(contact()));
    wizard.advance(StepData::Business(business()));
    wizard.advance(StepData::Payment(payment()));
    wizard.advance(StepData::Documents(documents));
    assert_eq!(wizard.current_step(), StepId::Review);
}

/// In-process backend that records every call.
#[derive(Default)]
pub struct RecordingApi {
    pub upload_status: Option<u16>,
    pub uploads: RefCell<Vec<(String, DocumentKind)>>,
    pub registrations: RefCell<Vec<MerchantRegistration>>,
}

impl RecordingApi {
    pub fn failing_uploads(status: u16) -> Self {
        Self {
            upload_status: Some(status),
            ..Self::default()
        }
    }
}

impl MerchantApi for RecordingApi {
    fn upload_file(&self, file: &Attachment, kind: DocumentKind) -> Result<String, UploadError> {
        self.uploads.borrow_mut().push((file.name.clone(), kind));
        if let Some(status) = self.upload_status {
            return Err(UploadError::Rejected {
                status,
                message: format!("HTTP error! status: {status}"),
            });
        }
        Ok(format!("/uploads/documents/{}", file.name))
    }

    fn register_merchant(&self, payload: &MerchantRegistration) -> Result<Value, SubmissionError> {
        self.registrations.borrow_mut().push(payload.clone());
        Ok(json!({ "merchantId": 7 }))
    }
}
