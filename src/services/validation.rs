//! Form validation
//!
//! Runs before any network call. Every failing field gets its own message
//! so a form can show them all at once.

use crate::error::{FieldErrors, RubikResult};
use crate::models::{parse_due_date, ExpenseDraft, Money, PropertyDraft, Registration};

pub const MIN_PASSWORD_LEN: usize = 6;

const REQUIRED: &str = "is required";

/// Loose shape check: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
    }
}

fn require_positive(errors: &mut FieldErrors, field: &'static str, value: u32) {
    if value < 1 {
        errors.add(field, "must be at least 1");
    }
}

fn require_value(errors: &mut FieldErrors, value: Money) {
    if value < Money::from_reais(1) {
        errors.add("value", "must be at least R$ 1,00");
    }
}

pub fn validate_login(email: &str, password: &str) -> RubikResult<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "email", email);
    if password.is_empty() {
        errors.add("password", REQUIRED);
    }
    errors.into_result()
}

pub fn validate_registration(form: &Registration) -> RubikResult<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name", &form.name);

    if form.email.trim().is_empty() {
        errors.add("email", REQUIRED);
    } else if !is_valid_email(&form.email) {
        errors.add("email", "is not a valid email address");
    }

    if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
    if form.confirm_password != form.password {
        errors.add("confirm_password", "does not match the password");
    }
    errors.into_result()
}

pub fn validate_property(draft: &PropertyDraft) -> RubikResult<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "address", &draft.address);
    require(&mut errors, "city", &draft.city);
    require(&mut errors, "state", &draft.state);
    require(&mut errors, "cep", &draft.cep);
    require(&mut errors, "notary_registration", &draft.notary_registration);
    require(&mut errors, "tax_registration", &draft.tax_registration);
    require(&mut errors, "water_registration", &draft.water_registration);
    require(&mut errors, "energy_registration", &draft.energy_registration);
    require_positive(&mut errors, "rooms", draft.rooms);
    require_positive(&mut errors, "bathrooms", draft.bathrooms);
    require_positive(&mut errors, "garage_spaces", draft.garage_spaces);
    require_value(&mut errors, draft.value);
    errors.into_result()
}

pub fn validate_expense(draft: &ExpenseDraft) -> RubikResult<()> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "cep", &draft.cep);
    if draft.due_date.trim().is_empty() {
        errors.add("due_date", REQUIRED);
    } else if parse_due_date(&draft.due_date).is_none() {
        errors.add("due_date", "is not a valid date");
    }
    require_value(&mut errors, draft.value);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RubikError;
    use crate::models::{ExpenseType, PropertyType};
    use chrono::NaiveDate;

    fn field_errors(result: RubikResult<()>) -> FieldErrors {
        match result {
            Err(RubikError::Form(errors)) => errors,
            other => panic!("expected form errors, got {other:?}"),
        }
    }

    fn registration() -> Registration {
        Registration {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email(" ana.souza@mail.gov.br "));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("ana@example.com."));
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn test_registration_collects_every_field() {
        let form = Registration {
            name: " ".into(),
            email: "not-an-email".into(),
            password: "12345".into(),
            confirm_password: "54321".into(),
        };
        let errors = field_errors(validate_registration(&form));
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some(REQUIRED));
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("confirm_password").is_some());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = field_errors(validate_login("", ""));
        assert_eq!(errors.len(), 2);
        assert!(validate_login("ana@example.com", "x").is_ok());
    }

    #[test]
    fn test_property_rules() {
        let mut draft = PropertyDraft {
            cep: "70000-000".into(),
            address: "QNN 10, Conjunto 12, Casa 23".into(),
            city: "Brasília".into(),
            state: "DF".into(),
            property_type: PropertyType::House,
            rooms: 4,
            bathrooms: 3,
            garage_spaces: 2,
            acquisition_date: NaiveDate::from_ymd_opt(2023, 2, 15).unwrap(),
            value: Money::from_reais(950_000),
            notary_registration: "REG-1".into(),
            tax_registration: "IPTU-1".into(),
            energy_provider: "Neoenergia".into(),
            energy_registration: "11223344".into(),
            water_provider: "CAESB".into(),
            water_registration: "44556677".into(),
        };
        assert!(validate_property(&draft).is_ok());

        draft.garage_spaces = 0;
        draft.water_registration.clear();
        draft.value = Money::from_cents(50);
        let errors = field_errors(validate_property(&draft));
        assert_eq!(errors.len(), 3);
        assert!(errors.get("garage_spaces").is_some());
        assert!(errors.get("water_registration").is_some());
        assert!(errors.get("value").is_some());
    }

    #[test]
    fn test_expense_rules() {
        let mut draft = ExpenseDraft {
            cep: "70000-000".into(),
            expense_type: ExpenseType::Water,
            description: String::new(),
            installments: 0,
            due_date: "22/06/2025".into(),
            is_paid: false,
            value: Money::from_reais(150),
        };
        assert!(validate_expense(&draft).is_ok());

        draft.due_date = "amanhã".into();
        draft.cep.clear();
        let errors = field_errors(validate_expense(&draft));
        assert_eq!(errors.get("due_date"), Some("is not a valid date"));
        assert_eq!(errors.get("cep"), Some(REQUIRED));
    }
}
