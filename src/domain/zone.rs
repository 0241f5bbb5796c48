use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{NonEmptyString, PhoneNumber, ZoneId};

/// Administrative grouping of karkuns, as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    /// Backend identifier.
    pub id: ZoneId,
    /// Zone name in English.
    #[serde(default)]
    pub title_en: String,
    /// Zone name in Urdu.
    #[serde(default)]
    pub title_ur: String,
    /// Country, English spelling.
    #[serde(default)]
    pub country_en: String,
    /// Country, Urdu spelling.
    #[serde(default)]
    pub country_ur: String,
    /// City, English spelling.
    #[serde(default)]
    pub city_en: String,
    /// City, Urdu spelling.
    #[serde(default)]
    pub city_ur: String,
    /// Person in charge of the zone.
    #[serde(default)]
    pub ceo: Option<String>,
    /// Main contact number.
    #[serde(default)]
    pub primary_phone_number: Option<String>,
    /// Backup contact number.
    #[serde(default)]
    pub secondary_phone_number: Option<String>,
    /// Creation time reported by the backend.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /zones/add` and `PUT /zones/update/{id}`.
///
/// The zones endpoint expects camelCase keys.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewZone {
    pub title_en: NonEmptyString,
    pub title_ur: NonEmptyString,
    pub country_en: NonEmptyString,
    pub country_ur: NonEmptyString,
    pub city_en: NonEmptyString,
    pub city_ur: NonEmptyString,
    /// Omitted from the body when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    pub primary_phone_number: PhoneNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_phone_number: Option<PhoneNumber>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn zone_payload_uses_camel_case_keys() {
        let payload = NewZone {
            title_en: NonEmptyString::new("Lahore Zone").unwrap(),
            title_ur: NonEmptyString::new("لاہور زون").unwrap(),
            country_en: NonEmptyString::new("Pakistan").unwrap(),
            country_ur: NonEmptyString::new("پاکستان").unwrap(),
            city_en: NonEmptyString::new("Lahore").unwrap(),
            city_ur: NonEmptyString::new("لاہور").unwrap(),
            ceo: None,
            primary_phone_number: PhoneNumber::new("03001234567").unwrap(),
            secondary_phone_number: None,
        };

        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["titleEn"], json!("Lahore Zone"));
        assert_eq!(value["primaryPhoneNumber"], json!("03001234567"));
        assert!(value.get("ceo").is_none());
        assert!(value.get("title_en").is_none());
    }

    #[test]
    fn zone_tolerates_missing_optional_columns() {
        let zone: Zone = serde_json::from_value(json!({"id": 3, "title_en": "Karachi"})).unwrap();

        assert_eq!(zone.id.get(), 3);
        assert_eq!(zone.title_en, "Karachi");
        assert!(zone.ceo.is_none());
    }
}
