use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::resources::NaatShareefs;
use crate::domain::naat_shareef::{NaatShareef, NewNaatShareef, slugify};
use crate::domain::types::{CategoryId, FileUrl, NaatShareefId, NonEmptyString, TagId, optional_text};
use crate::forms::{
    Editable, FormError, copy_slug, copy_title, validate_optional_url, validate_required,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Input of the naat shareef dialog.
pub struct NaatShareefForm {
    /// Derived from `title_en` when left blank.
    pub slug: String,
    /// Title in English.
    #[validate(custom(function = "validate_required", message = "Title (English) is required"))]
    pub title_en: String,
    /// Title in Urdu.
    #[validate(custom(function = "validate_required", message = "Title (Urdu) is required"))]
    pub title_ur: String,
    /// Category the naat is filed under.
    #[validate(required(message = "Category is required"))]
    pub category_id: Option<CategoryId>,
    /// Track label shown by the player.
    pub track: String,
    /// Tags attached to the naat.
    pub tags: BTreeSet<TagId>,
    /// URL of the uploaded audio file.
    #[validate(custom(function = "validate_optional_url"))]
    pub filepath: String,
}

impl NaatShareefForm {
    /// Adds the tag when missing, removes it otherwise. Returns whether the
    /// tag is selected afterwards.
    pub fn toggle_tag(&mut self, tag: TagId) -> bool {
        if self.tags.remove(&tag) {
            false
        } else {
            self.tags.insert(tag);
            true
        }
    }

    /// Slug sent to the backend.
    pub fn effective_slug(&self) -> String {
        match optional_text(Some(&self.slug)) {
            Some(slug) => slugify(&slug),
            None => slugify(&self.title_en),
        }
    }
}

impl Editable for NaatShareefs {
    type Form = NaatShareefForm;

    fn entity_id(entity: &NaatShareef) -> NaatShareefId {
        entity.id
    }

    fn edit_form(naat: &NaatShareef) -> NaatShareefForm {
        NaatShareefForm {
            slug: naat.slug.clone(),
            title_en: naat.title_en.clone(),
            title_ur: naat.title_ur.clone(),
            category_id: naat.category_id,
            track: naat.track.clone().unwrap_or_default(),
            tags: naat.tags.clone(),
            filepath: naat.filepath.clone().unwrap_or_default(),
        }
    }

    fn duplicate_form(naat: &NaatShareef) -> NaatShareefForm {
        let mut form = Self::edit_form(naat);
        form.title_en = copy_title(&naat.title_en);
        form.title_ur = copy_title(&naat.title_ur);
        form.slug = copy_slug(&naat.slug);
        form
    }

    fn to_payload(form: &NaatShareefForm) -> Result<NewNaatShareef, FormError> {
        let slug = NonEmptyString::new(form.effective_slug())
            .map_err(|_| FormError::InvalidValue("slug".to_string()))?;
        Ok(NewNaatShareef {
            slug,
            title_en: NonEmptyString::new(form.title_en.as_str())?,
            title_ur: NonEmptyString::new(form.title_ur.as_str())?,
            category_id: form.category_id.ok_or(FormError::Required)?,
            track: optional_text(Some(&form.track)),
            tags: form.tags.clone(),
            filepath: optional_text(Some(&form.filepath))
                .map(FileUrl::new)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tag(id: i32) -> TagId {
        TagId::new(id).unwrap()
    }

    fn filled() -> NaatShareefForm {
        NaatShareefForm {
            title_en: "Ya Nabi Salam Alaika".into(),
            title_ur: "یا نبی سلام علیک".into(),
            category_id: Some(CategoryId::new(2).unwrap()),
            ..NaatShareefForm::default()
        }
    }

    #[test]
    fn blank_slug_is_derived_from_title() {
        let payload = NaatShareefs::validated_payload(&filled()).unwrap();

        assert_eq!(payload.slug.as_str(), "ya-nabi-salam-alaika");
    }

    #[test]
    fn toggling_tags_keeps_a_sorted_set() {
        let mut form = filled();
        assert!(form.toggle_tag(tag(9)));
        assert!(form.toggle_tag(tag(3)));
        assert!(form.toggle_tag(tag(5)));
        assert!(!form.toggle_tag(tag(5)));

        let value = serde_json::to_value(NaatShareefs::validated_payload(&form).unwrap()).unwrap();

        assert_eq!(value["tags"], json!("3,9"));
    }

    #[test]
    fn category_is_required() {
        let form = NaatShareefForm {
            category_id: None,
            ..filled()
        };

        let err = NaatShareefs::validated_payload(&form).unwrap_err();

        assert_eq!(err.field_errors()[0].0, "category_id");
    }

    #[test]
    fn urdu_only_title_needs_an_explicit_slug() {
        let form = NaatShareefForm {
            title_en: "نعت".into(),
            ..filled()
        };

        assert_eq!(
            NaatShareefs::validated_payload(&form),
            Err(FormError::InvalidValue("slug".to_string()))
        );
    }

    #[test]
    fn duplicate_suffixes_slug_and_titles() {
        let naat: NaatShareef = serde_json::from_value(json!({
            "id": 7,
            "slug": "ya-nabi",
            "title_en": "Ya Nabi",
            "title_ur": "یا نبی",
            "tags": "1,2"
        }))
        .unwrap();

        let form = NaatShareefs::duplicate_form(&naat);

        assert_eq!(form.slug, "ya-nabi-copy");
        assert_eq!(form.title_en, "Ya Nabi (Copy)");
        assert_eq!(form.tags.len(), 2);
    }
}
