use serde::{Deserialize, Serialize};

use crate::domain::types::{
    EmailAddress, KarkunJoinRequestId, NonEmptyString, PhoneNumber, UserType, ZoneId,
};

/// Application to join as a karkun.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KarkunJoinRequest {
    /// Backend identifier.
    pub id: KarkunJoinRequestId,
    /// Applicant's first name.
    #[serde(default)]
    pub first_name: String,
    /// Applicant's last name.
    #[serde(default)]
    pub last_name: String,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
    /// Contact number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Requested role as sent by the backend, e.g. `karkun`.
    #[serde(default)]
    pub user_type: Option<String>,
    /// Year of birth.
    #[serde(default)]
    pub birth_year: Option<i32>,
    /// Year the applicant took the ehad.
    #[serde(default)]
    pub ehad_year: Option<i32>,
    /// Zone the applicant joins.
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    /// City of residence.
    #[serde(default)]
    pub city: Option<String>,
    /// Country of residence.
    #[serde(default)]
    pub country: Option<String>,
    /// Set once an admin approves the request.
    #[serde(default)]
    pub is_approved: bool,
}

impl KarkunJoinRequest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn kind(&self) -> Option<UserType> {
        self.user_type.as_deref().and_then(|t| t.parse().ok())
    }
}

/// Body of `POST /karkun-join-requests/add` and the matching update.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewKarkunJoinRequest {
    pub first_name: NonEmptyString,
    pub last_name: NonEmptyString,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ehad_year: Option<i32>,
    pub zone_id: ZoneId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Body of the approval toggle; only the one flag changes.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ApprovalChange {
    /// New approval state.
    pub is_approved: bool,
}
