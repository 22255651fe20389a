//! Canonical backend payload and the normalization that produces it.
//!
//! Normalization accepts the draft in any of the shapes it has taken on its
//! way through the wizard (form-layer names, list or joined channel field,
//! missing optional fields) and produces the exact record the backend expects.
use super::options::split_channel_list;
use super::ACTIVE_STATUS;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The registration record accepted by `POST /Merchant/AddMerchant`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRegistration {
    pub business_name: String,
    pub business_type: String,
    pub business_registration_no: String,
    pub krapin: String,
    pub business_nature: String,
    pub business_category: String,
    pub merchant_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub social_media: String,
    pub bank_name: String,
    pub bank_account_no: String,
    pub bank_account_name: String,
    pub mpesa_paybill: String,
    pub mpesa_till_number: String,
    pub preferred_payment_channel: String,
    pub krapin_certificate: String,
    pub business_registration_certificate: String,
    pub terms_and_condition: bool,
    pub delivery_method: String,
    pub return_policy: bool,
    pub status: String,
}

fn text(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(value)) => value.to_string(),
        _ => String::new(),
    }
}

/// First non-empty text value among `keys`.
fn first_text(raw: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text(raw, key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn truthy(raw: &Value, key: &str) -> bool {
    match raw.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::Number(value)) => value.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(value)) => !value.is_empty() && value != "false",
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

/// Produce the canonical payload from a raw draft of any shape.
///
/// Idempotent: normalizing the serialized result returns the same payload.
pub fn normalize(raw: &Value) -> MerchantRegistration {
    let status = text(raw, "status");
    let payload = MerchantRegistration {
        business_name: text(raw, "businessName"),
        business_type: text(raw, "businessType"),
        business_registration_no: text(raw, "businessRegistrationNo"),
        krapin: first_text(raw, &["krapin", "kraPin"]),
        business_nature: text(raw, "businessNature"),
        business_category: text(raw, "businessCategory"),
        merchant_name: text(raw, "merchantName"),
        email: text(raw, "email"),
        phone: text(raw, "phone"),
        address: text(raw, "address"),
        social_media: text(raw, "socialMedia"),
        bank_name: text(raw, "bankName"),
        bank_account_no: text(raw, "bankAccountNo"),
        bank_account_name: text(raw, "bankAccountName"),
        mpesa_paybill: text(raw, "mpesaPaybill"),
        mpesa_till_number: text(raw, "mpesaTillNumber"),
        preferred_payment_channel: raw
            .get("preferredPaymentChannel")
            .map(|channels| split_channel_list(channels).join(","))
            .unwrap_or_default(),
        krapin_certificate: text(raw, "krapinCertificate"),
        business_registration_certificate: text(raw, "businessRegistrationCertificate"),
        terms_and_condition: truthy(raw, "termsAndCondition"),
        delivery_method: text(raw, "deliveryMethod"),
        return_policy: truthy(raw, "returnPolicy"),
        status: if status.is_empty() {
            ACTIVE_STATUS.to_string()
        } else {
            status
        },
    };
    if tracing::enabled!(tracing::Level::DEBUG) {
        let payload_bytes = serde_json::to_vec(&payload).map(|b| b.len()).unwrap_or(0);
        tracing::debug!(payload_bytes, "normalized merchant registration payload");
    }
    payload
}

/// A complete payload used as a reference for the backend contract.
pub fn sample_payload() -> MerchantRegistration {
    MerchantRegistration {
        business_name: "TechCorp Solutions".to_string(),
        business_type: "technology".to_string(),
        business_registration_no: "BRC12345".to_string(),
        krapin: "A123456789Z".to_string(),
        business_nature: "Software development and consulting services".to_string(),
        business_category: "electronics".to_string(),
        merchant_name: "John Doe".to_string(),
        email: "john@techcorp.com".to_string(),
        phone: "+254700123456".to_string(),
        address: "123 Tech Street, Nairobi, Kenya".to_string(),
        social_media: "@techcorp_solutions".to_string(),
        bank_name: "KCB Bank".to_string(),
        bank_account_no: "1234567890".to_string(),
        bank_account_name: "TechCorp Solutions Ltd".to_string(),
        mpesa_paybill: "400200".to_string(),
        mpesa_till_number: "123456".to_string(),
        preferred_payment_channel: "bank,mpesa".to_string(),
        krapin_certificate: "/uploads/documents/krapin_cert.pdf".to_string(),
        business_registration_certificate: "/uploads/documents/business_cert.pdf".to_string(),
        terms_and_condition: true,
        delivery_method: "both".to_string(),
        return_policy: true,
        status: ACTIVE_STATUS.to_string(),
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
