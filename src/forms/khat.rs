use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::resources::Questions;
use crate::domain::khat::{AnswerQuestion, NewQuestion, Question};
use crate::domain::types::{KhatId, NonEmptyString, QuestionId, optional_text};
use crate::forms::{Editable, FormError, validate_required};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QuestionForm {
    /// Letter the question belongs to.
    #[validate(required(message = "Khat is required"))]
    pub khat_id: Option<KhatId>,
    /// Question text.
    #[validate(custom(function = "validate_required", message = "Question is required"))]
    pub question: String,
    /// Name of whoever asked. Optional.
    pub asked_by: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Reply typed into the answer box of a pending question.
pub struct AnswerForm {
    /// Answer text; blank input is refused.
    #[validate(custom(function = "validate_required", message = "Answer is required"))]
    pub answer: String,
}

impl AnswerForm {
    pub fn for_question(question: &Question) -> Self {
        Self {
            answer: question.answer.clone().unwrap_or_default(),
        }
    }

    pub fn to_payload(&self) -> Result<AnswerQuestion, FormError> {
        self.validate()?;
        Ok(AnswerQuestion {
            answer: NonEmptyString::new(self.answer.as_str())?,
        })
    }
}

impl Editable for Questions {
    type Form = QuestionForm;

    fn entity_id(entity: &Question) -> QuestionId {
        entity.id
    }

    fn edit_form(question: &Question) -> QuestionForm {
        QuestionForm {
            khat_id: question.khat_id,
            question: question.question.clone(),
            asked_by: question.asked_by.clone().unwrap_or_default(),
        }
    }

    fn duplicate_form(question: &Question) -> QuestionForm {
        Self::edit_form(question)
    }

    fn to_payload(form: &QuestionForm) -> Result<NewQuestion, FormError> {
        Ok(NewQuestion {
            khat_id: form.khat_id.ok_or(FormError::Required)?,
            question: NonEmptyString::new(form.question.as_str())?,
            asked_by: optional_text(Some(&form.asked_by)),
        })
    }
}
