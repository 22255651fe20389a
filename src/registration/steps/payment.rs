use super::{FieldErrors, StepData, StepForm, StepId};
use crate::registration::options::{deserialize_channels, PaymentChannel};
use serde::{Deserialize, Serialize};

/// Conditional sections revealed by the selected channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentSection {
    BankDetails,
    MpesaDetails,
    CashOnDeliveryNotice,
}

/// Step 3: accepted payment channels and their account details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentForm {
    #[serde(deserialize_with = "deserialize_channels")]
    pub preferred_payment_channel: Vec<PaymentChannel>,
    pub bank_name: String,
    pub bank_account_no: String,
    pub bank_account_name: String,
    pub mpesa_paybill: String,
    pub mpesa_till_number: String,
}

impl PaymentForm {
    pub fn is_selected(&self, channel: PaymentChannel) -> bool {
        self.preferred_payment_channel.contains(&channel)
    }

    /// Check or uncheck a channel, keeping selection order.
    pub fn toggle_channel(&mut self, channel: PaymentChannel, checked: bool) {
        if checked {
            if !self.is_selected(channel) {
                self.preferred_payment_channel.push(channel);
            }
        } else {
            self.preferred_payment_channel.retain(|c| *c != channel);
        }
    }

    pub fn visible_sections(&self) -> Vec<PaymentSection> {
        let mut sections = Vec::new();
        if self.is_selected(PaymentChannel::Bank) {
            sections.push(PaymentSection::BankDetails);
        }
        if self.is_selected(PaymentChannel::Mpesa) {
            sections.push(PaymentSection::MpesaDetails);
        }
        if self.is_selected(PaymentChannel::Cash) {
            sections.push(PaymentSection::CashOnDeliveryNotice);
        }
        sections
    }

    /// Fields that must be filled for the current selection.
    ///
    /// M-Pesa needs only one of paybill or till, so neither is listed alone.
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields = vec!["preferredPaymentChannel"];
        if self.is_selected(PaymentChannel::Bank) {
            fields.extend(["bankName", "bankAccountNo", "bankAccountName"]);
        }
        fields
    }

    /// Copy of the form with sub-fields of unselected channels cleared.
    fn visible_only(&self) -> PaymentForm {
        let mut form = self.clone();
        if !form.is_selected(PaymentChannel::Bank) {
            form.bank_name.clear();
            form.bank_account_no.clear();
            form.bank_account_name.clear();
        }
        if !form.is_selected(PaymentChannel::Mpesa) {
            form.mpesa_paybill.clear();
            form.mpesa_till_number.clear();
        }
        form
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl StepForm for PaymentForm {
    const STEP: StepId = StepId::Payment;

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.preferred_payment_channel.is_empty() {
            errors.insert(
                "preferredPaymentChannel",
                "Please select at least one payment method".to_string(),
            );
        }
        if self.is_selected(PaymentChannel::Bank) {
            let bank_fields = [
                ("bankName", &self.bank_name, "Bank name"),
                ("bankAccountNo", &self.bank_account_no, "Bank account number"),
                ("bankAccountName", &self.bank_account_name, "Bank account name"),
            ];
            for (field, value, label) in bank_fields {
                if is_blank(value) {
                    errors.insert(
                        field,
                        format!("{label} is required when bank transfer is selected"),
                    );
                }
            }
        }
        if self.is_selected(PaymentChannel::Mpesa)
            && is_blank(&self.mpesa_paybill)
            && is_blank(&self.mpesa_till_number)
        {
            errors.insert(
                "mpesaPaybill",
                "Either Paybill or Till Number is required when M-Pesa is selected".to_string(),
            );
        }
        errors
    }

    fn step_data(&self) -> StepData {
        StepData::Payment(self.visible_only())
    }
}
