use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::resources::Zones;
use crate::domain::types::{NonEmptyString, PhoneNumber, ZoneId, optional_text};
use crate::domain::zone::{NewZone, Zone};
use crate::forms::{
    Editable, FormError, copy_title, validate_optional_phone, validate_phone, validate_required,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Input of the zone dialog.
pub struct ZoneForm {
    /// Zone name in English.
    #[validate(custom(function = "validate_required", message = "Title (English) is required"))]
    pub title_en: String,
    /// Zone name in Urdu.
    #[validate(custom(function = "validate_required", message = "Title (Urdu) is required"))]
    pub title_ur: String,
    /// Country, English spelling.
    #[validate(custom(function = "validate_required", message = "Country (English) is required"))]
    pub country_en: String,
    /// Country, Urdu spelling.
    #[validate(custom(function = "validate_required", message = "Country (Urdu) is required"))]
    pub country_ur: String,
    /// City, English spelling.
    #[validate(custom(function = "validate_required", message = "City (English) is required"))]
    pub city_en: String,
    /// City, Urdu spelling.
    #[validate(custom(function = "validate_required", message = "City (Urdu) is required"))]
    pub city_ur: String,
    /// Person in charge of the zone. Optional.
    pub ceo: String,
    /// Main contact number, eleven digits.
    #[validate(custom(function = "validate_phone"))]
    pub primary_phone_number: String,
    /// Backup contact number; may be left blank.
    #[validate(custom(function = "validate_optional_phone"))]
    pub secondary_phone_number: String,
}

impl Editable for Zones {
    type Form = ZoneForm;

    fn entity_id(entity: &Zone) -> ZoneId {
        entity.id
    }

    fn edit_form(zone: &Zone) -> ZoneForm {
        ZoneForm {
            title_en: zone.title_en.clone(),
            title_ur: zone.title_ur.clone(),
            country_en: zone.country_en.clone(),
            country_ur: zone.country_ur.clone(),
            city_en: zone.city_en.clone(),
            city_ur: zone.city_ur.clone(),
            ceo: zone.ceo.clone().unwrap_or_default(),
            primary_phone_number: zone.primary_phone_number.clone().unwrap_or_default(),
            secondary_phone_number: zone.secondary_phone_number.clone().unwrap_or_default(),
        }
    }

    fn duplicate_form(zone: &Zone) -> ZoneForm {
        let mut form = Self::edit_form(zone);
        form.title_en = copy_title(&zone.title_en);
        form.title_ur = copy_title(&zone.title_ur);
        form
    }

    fn to_payload(form: &ZoneForm) -> Result<NewZone, FormError> {
        let secondary = optional_text(Some(&form.secondary_phone_number))
            .map(PhoneNumber::new)
            .transpose()?;
        Ok(NewZone {
            title_en: NonEmptyString::new(form.title_en.as_str())?,
            title_ur: NonEmptyString::new(form.title_ur.as_str())?,
            country_en: NonEmptyString::new(form.country_en.as_str())?,
            country_ur: NonEmptyString::new(form.country_ur.as_str())?,
            city_en: NonEmptyString::new(form.city_en.as_str())?,
            city_ur: NonEmptyString::new(form.city_ur.as_str())?,
            ceo: optional_text(Some(&form.ceo)),
            primary_phone_number: PhoneNumber::new(form.primary_phone_number.as_str())?,
            secondary_phone_number: secondary,
        })
    }
}
