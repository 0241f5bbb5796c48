use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, FileUrl, NaatShareefId, NonEmptyString, TagId};

/// Devotional audio track.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NaatShareef {
    /// Backend identifier.
    pub id: NaatShareefId,
    /// URL-safe name.
    #[serde(default)]
    pub slug: String,
    /// Title in English.
    #[serde(default)]
    pub title_en: String,
    /// Title in Urdu.
    #[serde(default)]
    pub title_ur: String,
    /// Category the naat is filed under.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Track label shown by the player.
    #[serde(default)]
    pub track: Option<String>,
    /// Attached tags. Joined into a comma separated string on the wire.
    #[serde(default, with = "tag_list")]
    pub tags: BTreeSet<TagId>,
    /// URL of the audio file.
    #[serde(default)]
    pub filepath: Option<String>,
}

/// Body of `POST /naat-shareefs/add` and `PUT /naat-shareefs/update/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewNaatShareef {
    pub slug: NonEmptyString,
    pub title_en: NonEmptyString,
    pub title_ur: NonEmptyString,
    pub category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(with = "tag_list")]
    pub tags: BTreeSet<TagId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<FileUrl>,
}

/// Builds a URL slug out of a title: lowercase ASCII words joined by `-`.
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Wire codec for tag sets: the backend stores them as `"1,4,9"`.
///
/// Reading also accepts a JSON array of ids or `null`. Entries that are not
/// positive integers are dropped.
pub mod tag_list {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::domain::types::TagId;

    pub fn serialize<S: Serializer>(tags: &BTreeSet<TagId>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&join(tags))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<TagId>, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(text)) => parse(&text),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Number(n) => n.as_i64().and_then(to_tag),
                    Value::String(s) => s.trim().parse().ok().and_then(to_tag),
                    _ => None,
                })
                .collect(),
            _ => BTreeSet::new(),
        })
    }

    /// Joins tag ids in ascending order with commas.
    pub fn join(tags: &BTreeSet<TagId>) -> String {
        tags.iter()
            .map(TagId::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses a comma-joined list of tag ids.
    pub fn parse(text: &str) -> BTreeSet<TagId> {
        text.split(',')
            .filter_map(|part| part.trim().parse().ok().and_then(to_tag))
            .collect()
    }

    fn to_tag(value: i64) -> Option<TagId> {
        i32::try_from(value).ok().and_then(|v| TagId::new(v).ok())
    }
}
