//! Backend gateway for document upload and registration submission.
//!
//! [`MerchantApi`] is the seam between the wizard and the network. The HTTP
//! implementation lives in [`http`]; tests substitute their own.
mod http;

pub use http::HttpMerchantApi;

use crate::error::{SubmissionError, UploadError};
use crate::registration::{
    normalize, Attachment, DocumentKind, MerchantRegistration, RegistrationDraft,
};
use serde_json::Value;
use std::time::Instant;

/// Operations the registration flow needs from the backend.
pub trait MerchantApi {
    /// Upload one document and return the server-assigned path.
    fn upload_file(&self, file: &Attachment, kind: DocumentKind) -> Result<String, UploadError>;

    /// Submit the canonical payload and return the backend's JSON reply.
    fn register_merchant(&self, payload: &MerchantRegistration) -> Result<Value, SubmissionError>;
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// The payload that was accepted, including uploaded document paths.
    pub payload: MerchantRegistration,
    pub response: Value,
}

/// Upload attached documents, then submit the normalized registration.
///
/// Uploads run one at a time; the first failure aborts before the
/// registration request is sent. Absent documents are submitted as `""`.
pub fn submit_registration<A: MerchantApi + ?Sized>(
    api: &A,
    draft: &RegistrationDraft,
) -> Result<SubmissionOutcome, SubmissionError> {
    let start = Instant::now();
    let mut raw = draft.to_form_value();

    for kind in DocumentKind::ALL {
        let path = match draft.attachment(kind) {
            Some(file) => {
                let path = api.upload_file(file, kind)?;
                tracing::info!(kind = %kind, file = %file.name, path = %path, "document uploaded");
                path
            }
            None => String::new(),
        };
        if let Value::Object(fields) = &mut raw {
            fields.insert(kind.payload_field().to_string(), Value::String(path));
        }
    }

    let payload = normalize(&raw);
    let response = api.register_merchant(&payload)?;
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        merchant = %payload.merchant_name,
        "merchant registration accepted"
    );
    Ok(SubmissionOutcome { payload, response })
}
