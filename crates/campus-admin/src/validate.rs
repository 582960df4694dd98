//! Field-level input validation for the dashboard forms.

use std::sync::LazyLock;

use campus_core::error::FieldErrors;
use campus_core::models::billing_address::BillingAddressForm;
use campus_core::models::user::CreateAdmin;
use regex::Regex;

pub const MIN_NAME_LENGTH: usize = 2;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

static ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip regex is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

pub fn is_valid_zip(zip: &str) -> bool {
    ZIP_REGEX.is_match(zip.trim())
}

/// Record `REQUIRED` when `value` is blank. Returns whether it was present.
pub fn require(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, "REQUIRED", format!("{field} is required"));
        false
    } else {
        true
    }
}

fn require_name(errors: &mut FieldErrors, field: &str, value: &str) {
    if require(errors, field, value) && value.trim().chars().count() < MIN_NAME_LENGTH {
        errors.push(
            field,
            "TOO_SHORT",
            format!("{field} must be at least {MIN_NAME_LENGTH} characters"),
        );
    }
}

pub fn validate_admin(input: &CreateAdmin) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require_name(&mut errors, "first_name", &input.first_name);
    require_name(&mut errors, "last_name", &input.last_name);
    if require(&mut errors, "email", &input.email) && !is_valid_email(&input.email) {
        errors.push("email", "INVALID_EMAIL", "email address is not valid");
    }
    errors
}

pub fn validate_billing_address(form: &BillingAddressForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, "primary_address", &form.primary_address);
    require(&mut errors, "city", &form.city);
    require(&mut errors, "state", &form.state);
    require(&mut errors, "country", &form.country);
    if require(&mut errors, "zip", &form.zip) && !is_valid_zip(&form.zip) {
        errors.push("zip", "INVALID_ZIP", "ZIP must look like 12345 or 12345-6789");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email(" dean@college.edu "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@b.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("sp ace@b.com"));
    }

    #[test]
    fn zip_syntax() {
        assert!(is_valid_zip("05401"));
        assert!(is_valid_zip("05401-1234"));
        assert!(!is_valid_zip("5401"));
        assert!(!is_valid_zip("05401-12"));
        assert!(!is_valid_zip("ABCDE"));
    }

    #[test]
    fn admin_names_need_two_characters() {
        let errors = validate_admin(&CreateAdmin {
            first_name: "A".into(),
            last_name: "  ".into(),
            email: "bad".into(),
            ..Default::default()
        });
        assert!(errors.has("first_name", "TOO_SHORT"));
        assert!(errors.has("last_name", "REQUIRED"));
        assert!(errors.has("email", "INVALID_EMAIL"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_admin_has_no_errors() {
        let errors = validate_admin(&CreateAdmin {
            first_name: "Jo".into(),
            last_name: "Li".into(),
            email: "jo.li@college.edu".into(),
            ..Default::default()
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn billing_address_requires_every_field() {
        let errors = validate_billing_address(&BillingAddressForm {
            zip: "1234".into(),
            ..Default::default()
        });
        for field in ["primary_address", "city", "state", "country"] {
            assert!(errors.has(field, "REQUIRED"), "{field} should be required");
        }
        assert!(errors.has("zip", "INVALID_ZIP"));
    }
}
