//! Merchant registration domain: steps, draft, and canonical payload.
//!
//! Each wizard step validates its own slice of the draft and emits a
//! [`StepData`] value. The draft stores one optional slice per step, so fields
//! of steps the user has not completed are simply absent.
pub mod normalize;
pub mod options;
pub mod preview;
pub mod steps;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub use normalize::{normalize, sample_payload, MerchantRegistration};
pub use options::PaymentChannel;
pub use steps::{
    Attachment, BusinessForm, ContactForm, DocumentKind, DocumentSet, DocumentsForm, NavControls,
    PaymentForm, ReviewForm, ReviewRow, ReviewSection, StepForm, TermsAcceptance,
};

/// Field name to message, keyed by the form-layer field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Status recorded on every submitted registration.
pub const ACTIVE_STATUS: &str = "Active";

/// The five wizard steps, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Contact = 1,
    Business = 2,
    Payment = 3,
    Documents = 4,
    Review = 5,
}

impl StepId {
    pub const ALL: [StepId; 5] = [
        StepId::Contact,
        StepId::Business,
        StepId::Payment,
        StepId::Documents,
        StepId::Review,
    ];
    pub const FIRST: StepId = StepId::Contact;
    pub const LAST: StepId = StepId::Review;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        StepId::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        StepId::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(StepId::from_number)
    }

    /// Return the stable identifier used in logs and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Contact => "contact",
            StepId::Business => "business",
            StepId::Payment => "payment",
            StepId::Documents => "documents",
            StepId::Review => "review",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Contact => "Contact",
            StepId::Business => "Business",
            StepId::Payment => "Payments",
            StepId::Documents => "Documents",
            StepId::Review => "Review",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StepId::Contact => "Personal details",
            StepId::Business => "Business info",
            StepId::Payment => "Payment methods",
            StepId::Documents => "File uploads",
            StepId::Review => "Terms & submit",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated slice emitted by one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepData {
    Contact(ContactForm),
    Business(BusinessForm),
    Payment(PaymentForm),
    Documents(DocumentSet),
    Terms(TermsAcceptance),
}

impl StepData {
    pub fn step(&self) -> StepId {
        match self {
            StepData::Contact(_) => StepId::Contact,
            StepData::Business(_) => StepId::Business,
            StepData::Payment(_) => StepId::Payment,
            StepData::Documents(_) => StepId::Documents,
            StepData::Terms(_) => StepId::Review,
        }
    }
}

/// The in-progress registration accumulated across steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub contact: Option<ContactForm>,
    pub business: Option<BusinessForm>,
    pub payment: Option<PaymentForm>,
    pub documents: Option<DocumentSet>,
    pub terms: Option<TermsAcceptance>,
}

impl RegistrationDraft {
    /// Merge a step slice; a later slice for the same step replaces the earlier one.
    pub fn merge(&mut self, data: StepData) {
        match data {
            StepData::Contact(form) => self.contact = Some(form),
            StepData::Business(form) => self.business = Some(form),
            StepData::Payment(form) => self.payment = Some(form),
            StepData::Documents(set) => self.documents = Some(set),
            StepData::Terms(acceptance) => self.terms = Some(acceptance),
        }
    }

    pub fn has_step(&self, step: StepId) -> bool {
        match step {
            StepId::Contact => self.contact.is_some(),
            StepId::Business => self.business.is_some(),
            StepId::Payment => self.payment.is_some(),
            StepId::Documents => self.documents.is_some(),
            StepId::Review => self.terms.is_some(),
        }
    }

    /// First data-entry step whose slice is still missing.
    ///
    /// Documents are optional and never reported.
    pub fn first_missing_step(&self) -> Option<StepId> {
        [StepId::Contact, StepId::Business, StepId::Payment]
            .into_iter()
            .find(|step| !self.has_step(*step))
    }

    pub fn attachment(&self, kind: DocumentKind) -> Option<&Attachment> {
        self.documents.as_ref().and_then(|set| set.get(kind))
    }

    /// Render the draft in form-layer shape for normalization.
    ///
    /// Only completed slices contribute keys. Attachments are excluded; they
    /// are uploaded separately and replaced by server paths.
    pub fn to_form_value(&self) -> Value {
        let mut object = Map::new();
        extend_with(&mut object, self.contact.as_ref());
        extend_with(&mut object, self.business.as_ref());
        extend_with(&mut object, self.payment.as_ref());
        extend_with(&mut object, self.terms.as_ref());
        object.insert(
            "status".to_string(),
            Value::String(ACTIVE_STATUS.to_string()),
        );
        Value::Object(object)
    }
}

fn extend_with<T: Serialize>(object: &mut Map<String, Value>, slice: Option<&T>) {
    let Some(slice) = slice else {
        return;
    };
    // Form slices are plain structs of strings, lists, and bools.
    if let Ok(Value::Object(fields)) = serde_json::to_value(slice) {
        object.extend(fields);
    }
}
