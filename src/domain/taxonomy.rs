//! Lookup tables used to classify naat shareefs.

use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, NonEmptyString, TagId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Backend identifier.
    pub id: TagId,
    /// Label in English.
    #[serde(default)]
    pub name_en: String,
    /// Label in Urdu.
    #[serde(default)]
    pub name_ur: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Backend identifier.
    pub id: CategoryId,
    /// Title in English.
    #[serde(default)]
    pub title_en: String,
    /// Title in Urdu.
    #[serde(default)]
    pub title_ur: String,
}

/// Body shared by tag create and update.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewTag {
    pub name_en: NonEmptyString,
    pub name_ur: NonEmptyString,
}

/// Body shared by category create and update.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewCategory {
    pub title_en: NonEmptyString,
    pub title_ur: NonEmptyString,
}
