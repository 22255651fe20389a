use super::{require_min_chars, require_present, FieldErrors, StepData, StepForm, StepId};
use crate::registration::options::{
    is_known, SelectOption, BUSINESS_CATEGORIES, BUSINESS_TYPES, DELIVERY_METHODS,
};
use serde::{Deserialize, Serialize};

/// Step 2: the legal and commercial identity of the business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessForm {
    pub business_name: String,
    pub business_type: String,
    pub business_registration_no: String,
    #[serde(alias = "krapin")]
    pub kra_pin: String,
    pub business_nature: String,
    pub business_category: String,
    pub delivery_method: String,
}

fn require_choice(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    options: &[SelectOption],
    message: &str,
) {
    if !is_known(options, value.trim()) {
        errors.insert(field, message.to_string());
    }
}

impl StepForm for BusinessForm {
    const STEP: StepId = StepId::Business;

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_min_chars(
            &mut errors,
            "businessName",
            &self.business_name,
            2,
            "Business name must be at least 2 characters",
        );
        require_choice(
            &mut errors,
            "businessType",
            &self.business_type,
            BUSINESS_TYPES,
            "Please select a business type",
        );
        require_present(
            &mut errors,
            "businessRegistrationNo",
            &self.business_registration_no,
            "Business registration number is required",
        );
        require_present(&mut errors, "kraPin", &self.kra_pin, "KRA PIN is required");
        require_present(
            &mut errors,
            "businessNature",
            &self.business_nature,
            "Business nature is required",
        );
        require_choice(
            &mut errors,
            "businessCategory",
            &self.business_category,
            BUSINESS_CATEGORIES,
            "Business category is required",
        );
        require_choice(
            &mut errors,
            "deliveryMethod",
            &self.delivery_method,
            DELIVERY_METHODS,
            "Delivery method is required",
        );
        errors
    }

    /// Enumerated fields are emitted as the bare option value.
    fn step_data(&self) -> StepData {
        let mut form = self.clone();
        for value in [
            &mut form.business_type,
            &mut form.business_category,
            &mut form.delivery_method,
        ] {
            *value = value.trim().to_string();
        }
        StepData::Business(form)
    }
}
