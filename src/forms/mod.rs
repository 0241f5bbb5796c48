//! Form schemas backing the create/edit dialogs.
//!
//! A form holds raw user input, validates it with `validator` and converts
//! into the typed payload of its resource.

use std::borrow::Cow;
use std::fmt::Debug;

use chrono::NaiveDate;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::api::Resource;
use crate::domain::types::{TypeConstraintError, is_valid_phone};

pub mod karkun;
pub mod khat;
pub mod mehfil;
pub mod message;
pub mod naat_shareef;
pub mod tarteeb;
pub mod taxonomy;
pub mod zone;

/// Date format used by date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("required field is empty")]
    Required,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid id")]
    InvalidId,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::NonPositiveId => FormError::InvalidId,
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::EmptyString => FormError::Required,
            TypeConstraintError::InvalidValue(value) => FormError::InvalidValue(value),
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidUrl => FormError::InvalidUrl,
        }
    }
}

impl FormError {
    /// `(field, message)` pairs for inline rendering, nested fields joined
    /// with `.`. Errors not tied to a field are reported under `""`.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        match self {
            FormError::Validation(errors) => collect_errors("", errors, &mut out),
            other => out.push((String::new(), other.to_string())),
        }
        out.sort();
        out
    }
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| error.code.to_string());
                    let path = if path == "__all__" { String::new() } else { path.clone() };
                    out.push((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects values that are empty once trimmed.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("required", "This field is required"))
    } else {
        Ok(())
    }
}

/// Exactly eleven digits.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if is_valid_phone(value.trim()) {
        Ok(())
    } else {
        Err(error("phone", "Phone number must be exactly 11 digits"))
    }
}

/// Like [`validate_phone`], but an empty value is accepted.
pub fn validate_optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Ok(())
    } else {
        validate_phone(value)
    }
}

/// `YYYY-MM-DD`.
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| error("date", "Date must use the YYYY-MM-DD format"))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Non-blank input must be an absolute URL.
pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    use validator::ValidateUrl;

    let value = value.trim();
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(error("url", "Must be a valid URL"))
    }
}

/// Suffix appended to names of duplicated records.
pub const COPY_SUFFIX: &str = " (Copy)";

pub fn copy_title(value: &str) -> String {
    format!("{}{COPY_SUFFIX}", value.trim())
}

pub fn copy_email(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("copy.{value}")
    }
}

pub fn copy_slug(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{value}-copy")
    }
}

/// Links a resource to the form used by its create/edit dialog.
pub trait Editable: Resource {
    type Form: Validate + Clone + Debug + Default + PartialEq;

    fn entity_id(entity: &Self::Entity) -> Self::Id;

    /// Form prefilled for editing `entity`.
    fn edit_form(entity: &Self::Entity) -> Self::Form;

    /// Create form prefilled from `entity` with identifying fields altered.
    fn duplicate_form(entity: &Self::Entity) -> Self::Form;

    /// Converts already validated input into the outgoing payload.
    fn to_payload(form: &Self::Form) -> Result<Self::Payload, FormError>;

    /// Runs the schema, then converts.
    fn validated_payload(form: &Self::Form) -> Result<Self::Payload, FormError> {
        form.validate()?;
        Self::to_payload(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validator_counts_digits() {
        assert!(validate_phone("03001234567").is_ok());
        assert!(validate_phone("3001234567").is_err());
        assert!(validate_optional_phone("").is_ok());
        assert!(validate_optional_phone("123").is_err());
    }

    #[test]
    fn required_validator_trims() {
        assert!(validate_required("Lahore").is_ok());
        assert!(validate_required("").is_err());
        assert!(validate_required(" \t ").is_err());
    }

    #[test]
    fn date_and_url_validators() {
        assert!(validate_date("2024-02-29").is_ok());
        assert!(validate_date("29/02/2024").is_err());
        assert!(validate_optional_url("").is_ok());
        assert!(validate_optional_url("https://cdn.example.org/a.mp3").is_ok());
        assert!(validate_optional_url("a.mp3").is_err());
    }

    #[test]
    fn copy_helpers() {
        assert_eq!(copy_title("Lahore Zone "), "Lahore Zone (Copy)");
        assert_eq!(copy_email("ali@example.com"), "copy.ali@example.com");
        assert_eq!(copy_email(""), "");
        assert_eq!(copy_slug("ya-nabi"), "ya-nabi-copy");
    }

    #[test]
    fn constraint_errors_map_to_form_errors() {
        assert_eq!(
            FormError::from(TypeConstraintError::InvalidPhone),
            FormError::InvalidPhoneNumber
        );
        assert_eq!(
            FormError::Required.field_errors(),
            vec![(String::new(), "required field is empty".to_string())]
        );
    }
}
