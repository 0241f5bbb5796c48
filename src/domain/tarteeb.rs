use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{
    EmailAddress, NonEmptyString, PhoneNumber, Prayer, TarteebRequestId, TarteebStatus, ZoneId,
};

/// Upper bound for a single daily wazaif counter.
pub const MAX_DAILY_COUNT: u32 = 100_000;

/// Daily recitation counters. Missing counters read as zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct WazaifCounts {
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub kalma_tayyaba: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub darood_shareef: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub istighfar: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub kalma_tamjeed: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub ya_hayyu_ya_qayyum: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub la_hawla: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub subhan_allah: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub alhamdulillah: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub allahu_akbar: u32,
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub surah_ikhlas: u32,
    /// Recitations of the Ism-e-Zaat.
    #[serde(default)]
    #[validate(range(max = MAX_DAILY_COUNT))]
    pub ism_e_zaat: u32,
}

impl WazaifCounts {
    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        [
            self.kalma_tayyaba,
            self.darood_shareef,
            self.istighfar,
            self.kalma_tamjeed,
            self.ya_hayyu_ya_qayyum,
            self.la_hawla,
            self.subhan_allah,
            self.alhamdulillah,
            self.allahu_akbar,
            self.surah_ikhlas,
            self.ism_e_zaat,
        ]
        .iter()
        .map(|&count| u64::from(count))
        .sum()
    }
}

/// Request to change a member's assigned regimen of wazaif.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TarteebRequest {
    /// Backend identifier.
    pub id: TarteebRequestId,
    /// Requester's full name.
    #[serde(default)]
    pub full_name: String,
    /// Father's name.
    #[serde(default)]
    pub father_name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// City of residence.
    #[serde(default)]
    pub city: Option<String>,
    /// Country of residence.
    #[serde(default)]
    pub country: Option<String>,
    /// Zone the requester belongs to.
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    /// Year of ehad.
    #[serde(default)]
    pub ehad_year: Option<i32>,
    /// Requester already serves as a karkun.
    #[serde(default)]
    pub is_karkun: bool,
    /// All five prayers are offered regularly.
    #[serde(default)]
    pub prayers_consistent: bool,
    /// Prayer names as sent by the backend.
    #[serde(default)]
    pub missed_prayers: Vec<String>,
    /// Recites the Quran regularly.
    #[serde(default)]
    pub recites_quran: bool,
    /// Attends the weekly mehfil.
    #[serde(default)]
    pub attends_weekly_mehfil: bool,
    /// Offers tahajjud.
    #[serde(default)]
    pub does_tahajjud: bool,
    /// Observes fasts regularly.
    #[serde(default)]
    pub observes_fasts: bool,
    /// Listens to naat regularly.
    #[serde(default)]
    pub listens_naat: bool,
    /// Daily recitation counters.
    #[serde(flatten)]
    pub wazaif: WazaifCounts,
    /// Wazaif currently recited, free text.
    #[serde(default)]
    pub current_wazaif: Option<String>,
    /// Why the tarteeb was requested.
    #[serde(default)]
    pub reason: Option<String>,
    /// Anything else the requester added.
    #[serde(default)]
    pub additional_notes: Option<String>,
    /// Reply written by the reviewing admin.
    #[serde(default)]
    pub response: Option<String>,
    /// Review status as sent by the backend.
    #[serde(default)]
    pub status: Option<String>,
    /// Submission time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TarteebRequest {
    /// Missed prayers the backend reported, ignoring unknown labels.
    pub fn missed(&self) -> BTreeSet<Prayer> {
        self.missed_prayers
            .iter()
            .filter_map(|p| p.parse().ok())
            .collect()
    }

    /// Processing state; requests without a status are still pending.
    pub fn state(&self) -> TarteebStatus {
        self.status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(TarteebStatus::Pending)
    }
}

/// Body of `POST /tarteeb-requests/add` and the matching update.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewTarteebRequest {
    pub full_name: NonEmptyString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
    pub phone_number: PhoneNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<ZoneId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ehad_year: Option<i32>,
    pub is_karkun: bool,
    pub prayers_consistent: bool,
    /// Always empty when `prayers_consistent` is set.
    pub missed_prayers: BTreeSet<Prayer>,
    pub recites_quran: bool,
    pub attends_weekly_mehfil: bool,
    pub does_tahajjud: bool,
    pub observes_fasts: bool,
    pub listens_naat: bool,
    #[serde(flatten)]
    pub wazaif: WazaifCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_wazaif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TarteebStatus>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn counters_default_to_zero_and_flatten() {
        let request: TarteebRequest = serde_json::from_value(json!({
            "id": 9,
            "full_name": "Ahmed",
            "istighfar": 300,
            "missed_prayers": ["Fajr", "Tahajjud"],
        }))
        .unwrap();

        assert_eq!(request.wazaif.istighfar, 300);
        assert_eq!(request.wazaif.kalma_tayyaba, 0);
        assert_eq!(request.wazaif.total(), 300);
        assert_eq!(request.missed(), [Prayer::Fajr].into_iter().collect());
        assert_eq!(request.state(), TarteebStatus::Pending);
    }
}
