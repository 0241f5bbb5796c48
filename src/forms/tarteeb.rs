//! Tarteeb request form.
//!
//! The missed-prayer checklist only exists while the applicant says their
//! prayers are not consistent. Switching to consistent clears it, and a
//! consistent form never submits missed prayers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::api::resources::TarteebRequests;
use crate::domain::tarteeb::{NewTarteebRequest, TarteebRequest, WazaifCounts};
use crate::domain::types::{
    EmailAddress, NonEmptyString, PhoneNumber, Prayer, TarteebRequestId, TarteebStatus, ZoneId,
    optional_text,
};
use crate::forms::{
    Editable, FormError, copy_email, copy_title, validate_phone, validate_required,
};

fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Enter a valid email address".into()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TarteebRequestForm {
    /// Requester's full name.
    #[validate(custom(function = "validate_required", message = "Full name is required"))]
    pub full_name: String,
    /// Father's name.
    pub father_name: String,
    /// Contact email; may be left blank.
    #[validate(custom(function = "validate_optional_email"))]
    pub email: String,
    /// Contact number, eleven digits.
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    /// Age in years.
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: Option<u32>,
    /// City of residence.
    pub city: String,
    /// Country of residence.
    pub country: String,
    /// Zone the requester belongs to, if any.
    pub zone_id: Option<ZoneId>,
    /// Year of ehad, if taken.
    pub ehad_year: Option<i32>,
    /// Requester already serves as a karkun.
    pub is_karkun: bool,
    /// All five prayers are offered regularly.
    prayers_consistent: bool,
    /// Prayers often missed. Always empty while `prayers_consistent` is set.
    missed_prayers: BTreeSet<Prayer>,
    /// Recites the Quran regularly.
    pub recites_quran: bool,
    /// Attends the weekly mehfil.
    pub attends_weekly_mehfil: bool,
    /// Offers tahajjud.
    pub does_tahajjud: bool,
    /// Observes fasts regularly.
    pub observes_fasts: bool,
    /// Listens to naat regularly.
    pub listens_naat: bool,
    /// Daily counts of each wazifa.
    #[validate(nested)]
    pub wazaif: WazaifCounts,
    /// Wazaif currently recited, free text.
    pub current_wazaif: String,
    /// Why the tarteeb is requested.
    pub reason: String,
    /// Anything else the requester adds.
    pub additional_notes: String,
    /// Review status of the request.
    pub status: Option<TarteebStatus>,
}

impl TarteebRequestForm {
    pub fn prayers_consistent(&self) -> bool {
        self.prayers_consistent
    }

    /// Marking prayers as consistent discards the checklist.
    pub fn set_prayers_consistent(&mut self, consistent: bool) {
        self.prayers_consistent = consistent;
        if consistent {
            self.missed_prayers.clear();
        }
    }

    /// Whether the missed-prayer checklist is shown.
    pub fn missed_prayers_visible(&self) -> bool {
        !self.prayers_consistent
    }

    pub fn missed_prayers(&self) -> &BTreeSet<Prayer> {
        &self.missed_prayers
    }

    /// Flips one checkbox; returns whether the prayer is marked missed
    /// afterwards. Ignored while prayers are consistent.
    pub fn toggle_missed_prayer(&mut self, prayer: Prayer) -> bool {
        if self.prayers_consistent {
            return false;
        }
        if self.missed_prayers.remove(&prayer) {
            false
        } else {
            self.missed_prayers.insert(prayer);
            true
        }
    }
}

impl Editable for TarteebRequests {
    type Form = TarteebRequestForm;

    fn entity_id(entity: &TarteebRequest) -> TarteebRequestId {
        entity.id
    }

    fn edit_form(request: &TarteebRequest) -> TarteebRequestForm {
        let mut form = TarteebRequestForm {
            full_name: request.full_name.clone(),
            father_name: request.father_name.clone().unwrap_or_default(),
            email: request.email.clone().unwrap_or_default(),
            phone_number: request.phone_number.clone().unwrap_or_default(),
            age: request.age,
            city: request.city.clone().unwrap_or_default(),
            country: request.country.clone().unwrap_or_default(),
            zone_id: request.zone_id,
            ehad_year: request.ehad_year,
            is_karkun: request.is_karkun,
            prayers_consistent: false,
            missed_prayers: request.missed(),
            recites_quran: request.recites_quran,
            attends_weekly_mehfil: request.attends_weekly_mehfil,
            does_tahajjud: request.does_tahajjud,
            observes_fasts: request.observes_fasts,
            listens_naat: request.listens_naat,
            wazaif: request.wazaif.clone(),
            current_wazaif: request.current_wazaif.clone().unwrap_or_default(),
            reason: request.reason.clone().unwrap_or_default(),
            additional_notes: request.additional_notes.clone().unwrap_or_default(),
            status: Some(request.state()),
        };
        form.set_prayers_consistent(request.prayers_consistent);
        form
    }

    fn duplicate_form(request: &TarteebRequest) -> TarteebRequestForm {
        let mut form = Self::edit_form(request);
        form.full_name = copy_title(&request.full_name);
        form.email = copy_email(request.email.as_deref().unwrap_or_default());
        form.status = None;
        form
    }

    fn to_payload(form: &TarteebRequestForm) -> Result<NewTarteebRequest, FormError> {
        let missed_prayers = if form.prayers_consistent {
            BTreeSet::new()
        } else {
            form.missed_prayers.clone()
        };
        Ok(NewTarteebRequest {
            full_name: NonEmptyString::new(form.full_name.as_str())?,
            father_name: optional_text(Some(&form.father_name)),
            email: optional_text(Some(&form.email))
                .map(EmailAddress::new)
                .transpose()?,
            phone_number: PhoneNumber::new(form.phone_number.as_str())?,
            age: form.age,
            city: optional_text(Some(&form.city)),
            country: optional_text(Some(&form.country)),
            zone_id: form.zone_id,
            ehad_year: form.ehad_year,
            is_karkun: form.is_karkun,
            prayers_consistent: form.prayers_consistent,
            missed_prayers,
            recites_quran: form.recites_quran,
            attends_weekly_mehfil: form.attends_weekly_mehfil,
            does_tahajjud: form.does_tahajjud,
            observes_fasts: form.observes_fasts,
            listens_naat: form.listens_naat,
            wazaif: form.wazaif.clone(),
            current_wazaif: optional_text(Some(&form.current_wazaif)),
            reason: optional_text(Some(&form.reason)),
            additional_notes: optional_text(Some(&form.additional_notes)),
            status: form.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::tarteeb::MAX_DAILY_COUNT;

    fn filled() -> TarteebRequestForm {
        TarteebRequestForm {
            full_name: "Ahmed Khan".into(),
            phone_number: "03211234567".into(),
            ..TarteebRequestForm::default()
        }
    }

    #[test]
    fn consistent_prayers_clear_and_lock_the_checklist() {
        let mut form = filled();
        assert!(form.missed_prayers_visible());
        assert!(form.toggle_missed_prayer(Prayer::Fajr));
        assert!(form.toggle_missed_prayer(Prayer::Isha));

        form.set_prayers_consistent(true);

        assert!(form.missed_prayers().is_empty());
        assert!(!form.missed_prayers_visible());
        assert!(!form.toggle_missed_prayer(Prayer::Asr));
        assert!(form.missed_prayers().is_empty());
    }

    #[test]
    fn unchecking_a_prayer_removes_it() {
        let mut form = filled();
        form.toggle_missed_prayer(Prayer::Zuhr);

        assert!(!form.toggle_missed_prayer(Prayer::Zuhr));
        assert!(form.missed_prayers().is_empty());
    }

    #[test]
    fn counters_default_to_zero_and_are_capped() {
        let mut form = filled();
        let payload = TarteebRequests::validated_payload(&form).unwrap();
        assert_eq!(payload.wazaif.total(), 0);

        form.wazaif.darood_shareef = MAX_DAILY_COUNT + 1;
        let err = TarteebRequests::validated_payload(&form).unwrap_err();
        assert_eq!(err.field_errors()[0].0, "wazaif.darood_shareef");
    }

    #[test]
    fn missed_prayers_are_sent_in_order() {
        let mut form = filled();
        form.toggle_missed_prayer(Prayer::Isha);
        form.toggle_missed_prayer(Prayer::Fajr);

        let value = serde_json::to_value(TarteebRequests::validated_payload(&form).unwrap()).unwrap();

        assert_eq!(value["missed_prayers"], json!(["Fajr", "Isha"]));
        assert_eq!(value["istighfar"], json!(0));
        assert!(value.get("email").is_none());
    }

    #[test]
    fn edit_prefill_respects_stored_consistency() {
        let request: TarteebRequest = serde_json::from_value(json!({
            "id": 4,
            "full_name": "Ahmed Khan",
            "prayers_consistent": true,
            "missed_prayers": ["Fajr"],
            "status": "approved"
        }))
        .unwrap();

        let form = TarteebRequests::edit_form(&request);

        assert!(form.prayers_consistent());
        assert!(form.missed_prayers().is_empty());
        assert_eq!(form.status, Some(TarteebStatus::Approved));
    }

    #[test]
    fn bad_optional_email_is_rejected() {
        let form = TarteebRequestForm {
            email: "not-an-email".into(),
            ..filled()
        };

        let err = TarteebRequests::validated_payload(&form).unwrap_err();

        assert_eq!(err.field_errors()[0].0, "email");
    }
}
