use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{FileUrl, MehfilId, MehfilType, NonEmptyString, Prayer};

/// Scheduled devotional gathering, optionally with a recording.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Mehfil {
    /// Backend identifier.
    pub id: MehfilId,
    /// Title in English.
    #[serde(default)]
    pub title_en: String,
    /// Title in Urdu.
    #[serde(default)]
    pub title_ur: String,
    /// Day of the gathering.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Prayer-time label the gathering is held after.
    #[serde(default)]
    pub time: Option<String>,
    /// Kind of gathering as sent by the backend.
    #[serde(default, rename = "type")]
    pub mehfil_type: Option<String>,
    /// URL of the recording, if one was uploaded.
    #[serde(default)]
    pub filepath: Option<String>,
    /// Visible to the public.
    #[serde(default)]
    pub is_published: bool,
}

impl Mehfil {
    /// Parsed prayer slot, `None` when the backend sent an unknown label.
    pub fn prayer_time(&self) -> Option<Prayer> {
        self.time.as_deref().and_then(|t| t.parse().ok())
    }

    pub fn kind(&self) -> Option<MehfilType> {
        self.mehfil_type.as_deref().and_then(|t| t.parse().ok())
    }
}

/// Body of `POST /mehfils/add` and `PUT /mehfils/update/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewMehfil {
    pub title_en: NonEmptyString,
    pub title_ur: NonEmptyString,
    pub date: NaiveDate,
    pub time: Prayer,
    #[serde(rename = "type")]
    pub mehfil_type: MehfilType,
    /// Omitted when no recording was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<FileUrl>,
    pub is_published: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_labels_do_not_break_decoding() {
        let mehfil: Mehfil = serde_json::from_value(json!({
            "id": 1,
            "title_en": "Monthly gathering",
            "date": "2024-03-01",
            "time": "After Jumma",
            "type": "Mehfil-e-Zikr",
            "is_published": true
        }))
        .unwrap();

        assert_eq!(mehfil.prayer_time(), None);
        assert_eq!(mehfil.kind(), Some(MehfilType::Zikr));
        assert!(mehfil.is_published);
    }
}
