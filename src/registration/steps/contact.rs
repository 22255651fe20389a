use super::{require_min_chars, FieldErrors, StepData, StepForm, StepId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const MIN_PHONE_DIGITS: usize = 10;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
        )
        .expect("email pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9\s()-]+$").expect("phone pattern compiles"))
}

/// Step 1: who the merchant is and how to reach them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub merchant_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub social_media: String,
}

impl StepForm for ContactForm {
    const STEP: StepId = StepId::Contact;

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require_min_chars(
            &mut errors,
            "merchantName",
            &self.merchant_name,
            2,
            "Merchant name must be at least 2 characters",
        );
        if !email_pattern().is_match(self.email.trim()) {
            errors.insert("email", "Please enter a valid email address".to_string());
        }
        let phone = self.phone.trim();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if digits < MIN_PHONE_DIGITS {
            errors.insert("phone", "Phone number must be at least 10 digits".to_string());
        } else if !phone_pattern().is_match(phone) {
            errors.insert("phone", "Please enter a valid phone number".to_string());
        }
        require_min_chars(
            &mut errors,
            "address",
            &self.address,
            10,
            "Please provide a complete address",
        );
        errors
    }

    fn step_data(&self) -> StepData {
        StepData::Contact(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactForm {
        ContactForm {
            merchant_name: "Jane Wanjiru".to_string(),
            email: "jane@techcorp.co.ke".to_string(),
            phone: "+254 (700) 123-456".to_string(),
            address: "123 Tech Street, Nairobi".to_string(),
            social_media: String::new(),
        }
    }

    #[test]
    fn valid_contact_enables_next() {
        let form = valid();
        assert!(form.is_valid());
        let controls = form.controls();
        assert!(controls.next_enabled);
        assert!(!controls.back_enabled);
    }

    #[test]
    fn each_single_violation_invalidates_the_step() {
        let cases: Vec<(&str, fn(&mut ContactForm))> = vec![
            ("merchantName", |form| form.merchant_name = "J".to_string()),
            ("email", |form| form.email = "jane@".to_string()),
            ("email", |form| form.email = "jane example.com".to_string()),
            ("phone", |form| form.phone = "0700 123".to_string()),
            ("phone", |form| form.phone = "0700-123-456 ext".to_string()),
            ("address", |form| form.address = "Nairobi".to_string()),
        ];
        for (field, mutate) in cases {
            let mut form = valid();
            mutate(&mut form);
            let errors = form.validate();
            assert_eq!(errors.len(), 1, "expected only {field} to fail: {errors:?}");
            assert!(errors.contains_key(field), "missing error for {field}");
            assert!(!form.controls().next_enabled);
        }
    }

    #[test]
    fn social_media_is_optional() {
        let mut form = valid();
        form.social_media = "@jane_shop".to_string();
        assert!(form.is_valid());
        form.social_media.clear();
        assert!(form.is_valid());
    }

    #[test]
    fn submit_reports_every_failing_field() {
        let err = ContactForm::default().submit().unwrap_err();
        assert_eq!(err.step, StepId::Contact);
        let fields: Vec<_> = err.fields.keys().copied().collect();
        assert_eq!(fields, vec!["address", "email", "merchantName", "phone"]);
    }
}
