use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::resources::{Categories, Tags};
use crate::domain::taxonomy::{Category, NewCategory, NewTag, Tag};
use crate::domain::types::{CategoryId, NonEmptyString, TagId};
use crate::forms::{Editable, FormError, copy_title, validate_required};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TagForm {
    /// Tag label in English.
    #[validate(custom(function = "validate_required", message = "Name (English) is required"))]
    pub name_en: String,
    /// Tag label in Urdu.
    #[validate(custom(function = "validate_required", message = "Name (Urdu) is required"))]
    pub name_ur: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryForm {
    /// Category title in English.
    #[validate(custom(function = "validate_required", message = "Title (English) is required"))]
    pub title_en: String,
    /// Category title in Urdu.
    #[validate(custom(function = "validate_required", message = "Title (Urdu) is required"))]
    pub title_ur: String,
}

impl Editable for Tags {
    type Form = TagForm;

    fn entity_id(entity: &Tag) -> TagId {
        entity.id
    }

    fn edit_form(tag: &Tag) -> TagForm {
        TagForm {
            name_en: tag.name_en.clone(),
            name_ur: tag.name_ur.clone(),
        }
    }

    fn duplicate_form(tag: &Tag) -> TagForm {
        TagForm {
            name_en: copy_title(&tag.name_en),
            name_ur: copy_title(&tag.name_ur),
        }
    }

    fn to_payload(form: &TagForm) -> Result<NewTag, FormError> {
        Ok(NewTag {
            name_en: NonEmptyString::new(form.name_en.as_str())?,
            name_ur: NonEmptyString::new(form.name_ur.as_str())?,
        })
    }
}

impl Editable for Categories {
    type Form = CategoryForm;

    fn entity_id(entity: &Category) -> CategoryId {
        entity.id
    }

    fn edit_form(category: &Category) -> CategoryForm {
        CategoryForm {
            title_en: category.title_en.clone(),
            title_ur: category.title_ur.clone(),
        }
    }

    fn duplicate_form(category: &Category) -> CategoryForm {
        CategoryForm {
            title_en: copy_title(&category.title_en),
            title_ur: copy_title(&category.title_ur),
        }
    }

    fn to_payload(form: &CategoryForm) -> Result<NewCategory, FormError> {
        Ok(NewCategory {
            title_en: NonEmptyString::new(form.title_en.as_str())?,
            title_ur: NonEmptyString::new(form.title_ur.as_str())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_are_trimmed() {
        let form = TagForm {
            name_en: " Madina ".into(),
            name_ur: "مدینہ".into(),
        };

        let payload = Tags::validated_payload(&form).unwrap();

        assert_eq!(payload.name_en.as_str(), "Madina");
    }

    #[test]
    fn empty_category_reports_both_titles() {
        let err = Categories::validated_payload(&CategoryForm::default()).unwrap_err();

        assert_eq!(err.field_errors().len(), 2);
    }
}
