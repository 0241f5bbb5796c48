use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::resources::Messages;
use crate::domain::message::{MAX_MESSAGE_LINKS, Message, MessageLink, NewMessage};
use crate::domain::types::{MessageId, NonEmptyString};
use crate::forms::{Editable, FormError, copy_title, validate_required};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Input of the message dialog.
pub struct MessageForm {
    /// Headline in English.
    #[validate(custom(function = "validate_required", message = "Title (English) is required"))]
    pub title_en: String,
    /// Headline in Urdu.
    #[validate(custom(function = "validate_required", message = "Title (Urdu) is required"))]
    pub title_ur: String,
    /// Rich text; sanitized on submit.
    pub description_en: String,
    /// Urdu counterpart of `description_en`.
    pub description_ur: String,
    /// Visible to the public.
    pub is_published: bool,
    /// Pinned above other messages.
    pub at_top: bool,
    /// Shown as a notice banner.
    pub show_notice: bool,
    /// Push a notification when saved.
    pub send_notification: bool,
    /// Related content, at most four entries.
    #[validate(
        length(max = 4, message = "At most 4 links are allowed"),
        custom(function = "validate_links")
    )]
    pub links: Vec<MessageLink>,
}

fn validate_links(links: &[MessageLink]) -> Result<(), ValidationError> {
    if links.iter().all(|link| link.category_id > 0 && link.link_id > 0) {
        Ok(())
    } else {
        Err(ValidationError::new("link").with_message("Every link needs a category and a target".into()))
    }
}

impl MessageForm {
    /// Appends a link; `false` when every slot is taken.
    pub fn add_link(&mut self, link: MessageLink) -> bool {
        if self.links.len() >= MAX_MESSAGE_LINKS {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn remove_link(&mut self, index: usize) -> Option<MessageLink> {
        (index < self.links.len()).then(|| self.links.remove(index))
    }
}

impl Editable for Messages {
    type Form = MessageForm;

    fn entity_id(entity: &Message) -> MessageId {
        entity.id
    }

    fn edit_form(message: &Message) -> MessageForm {
        MessageForm {
            title_en: message.title_en.clone(),
            title_ur: message.title_ur.clone(),
            description_en: message.description_en.clone(),
            description_ur: message.description_ur.clone(),
            is_published: message.is_published,
            at_top: message.at_top,
            show_notice: message.show_notice,
            send_notification: message.send_notification,
            links: message.links.clone(),
        }
    }

    fn duplicate_form(message: &Message) -> MessageForm {
        let mut form = Self::edit_form(message);
        form.title_en = copy_title(&message.title_en);
        form.title_ur = copy_title(&message.title_ur);
        form
    }

    fn to_payload(form: &MessageForm) -> Result<NewMessage, FormError> {
        if form.links.len() > MAX_MESSAGE_LINKS {
            return Err(FormError::InvalidValue("links".to_string()));
        }
        Ok(NewMessage {
            title_en: NonEmptyString::new(form.title_en.as_str())?,
            title_ur: NonEmptyString::new(form.title_ur.as_str())?,
            description_en: ammonia::clean(form.description_en.trim()),
            description_ur: ammonia::clean(form.description_ur.trim()),
            is_published: form.is_published,
            at_top: form.at_top,
            show_notice: form.show_notice,
            send_notification: form.send_notification,
            links: form.links.clone(),
        })
    }
}
