use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::resources::KarkunJoinRequests;
use crate::domain::karkun::{KarkunJoinRequest, NewKarkunJoinRequest};
use crate::domain::types::{
    EmailAddress, KarkunJoinRequestId, NonEmptyString, PhoneNumber, UserType, ZoneId,
    optional_text,
};
use crate::forms::{
    Editable, FormError, copy_email, copy_title, validate_phone, validate_required,
};

/// Earliest accepted birth or ehad year.
pub const MIN_YEAR: i32 = 1900;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_years"))]
/// Input of the karkun join request dialog.
pub struct KarkunJoinRequestForm {
    /// Applicant's first name.
    #[validate(custom(function = "validate_required", message = "First name is required"))]
    pub first_name: String,
    /// Applicant's last name.
    #[validate(custom(function = "validate_required", message = "Last name is required"))]
    pub last_name: String,
    /// Contact email address.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Contact number, eleven digits.
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    /// Role the applicant asks for.
    #[validate(required(message = "User type is required"))]
    pub user_type: Option<UserType>,
    /// Year of birth, if given.
    pub birth_year: Option<i32>,
    /// Year the applicant took the ehad, if given.
    pub ehad_year: Option<i32>,
    /// Zone the applicant joins.
    #[validate(required(message = "Zone is required"))]
    pub zone_id: Option<ZoneId>,
    /// City of residence.
    pub city: String,
    /// Country of residence.
    pub country: String,
}

fn validate_years(form: &KarkunJoinRequestForm) -> Result<(), ValidationError> {
    check_years(form.birth_year, form.ehad_year, Utc::now().year())
}

fn check_years(birth: Option<i32>, ehad: Option<i32>, current: i32) -> Result<(), ValidationError> {
    let in_range = |year: i32| (MIN_YEAR..=current).contains(&year);
    if birth.is_some_and(|year| !in_range(year)) {
        return Err(ValidationError::new("birth_year")
            .with_message(format!("Birth year must be between {MIN_YEAR} and {current}").into()));
    }
    if ehad.is_some_and(|year| !in_range(year)) {
        return Err(ValidationError::new("ehad_year")
            .with_message(format!("Ehad year must be between {MIN_YEAR} and {current}").into()));
    }
    if matches!((birth, ehad), (Some(birth), Some(ehad)) if ehad < birth) {
        return Err(ValidationError::new("ehad_year")
            .with_message("Ehad year cannot be before birth year".into()));
    }
    Ok(())
}

impl Editable for KarkunJoinRequests {
    type Form = KarkunJoinRequestForm;

    fn entity_id(entity: &KarkunJoinRequest) -> KarkunJoinRequestId {
        entity.id
    }

    fn edit_form(request: &KarkunJoinRequest) -> KarkunJoinRequestForm {
        KarkunJoinRequestForm {
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            phone_number: request.phone_number.clone().unwrap_or_default(),
            user_type: request.kind(),
            birth_year: request.birth_year,
            ehad_year: request.ehad_year,
            zone_id: request.zone_id,
            city: request.city.clone().unwrap_or_default(),
            country: request.country.clone().unwrap_or_default(),
        }
    }

    fn duplicate_form(request: &KarkunJoinRequest) -> KarkunJoinRequestForm {
        let mut form = Self::edit_form(request);
        form.first_name = copy_title(&request.first_name);
        form.email = copy_email(&request.email);
        form
    }

    fn to_payload(form: &KarkunJoinRequestForm) -> Result<NewKarkunJoinRequest, FormError> {
        Ok(NewKarkunJoinRequest {
            first_name: NonEmptyString::new(form.first_name.as_str())?,
            last_name: NonEmptyString::new(form.last_name.as_str())?,
            email: EmailAddress::new(form.email.as_str())?,
            phone_number: PhoneNumber::new(form.phone_number.as_str())?,
            user_type: form.user_type.ok_or(FormError::Required)?,
            birth_year: form.birth_year,
            ehad_year: form.ehad_year,
            zone_id: form.zone_id.ok_or(FormError::Required)?,
            city: optional_text(Some(&form.city)),
            country: optional_text(Some(&form.country)),
        })
    }
}
