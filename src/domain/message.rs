use serde::{Deserialize, Serialize};

use crate::domain::types::{MessageId, NonEmptyString};

/// Number of link slots the backend stores per message.
pub const MAX_MESSAGE_LINKS: usize = 4;

/// Reference from a message to another item (a mehfil, a naat, ...).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageLink {
    /// Kind of item linked to.
    pub category_id: i32,
    /// Identifier of the linked item.
    pub link_id: i32,
}

/// Message or notice shown to members.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "MessageRecord", into = "MessageRecord")]
pub struct Message {
    /// Backend identifier.
    pub id: MessageId,
    /// Headline in English.
    pub title_en: String,
    /// Headline in Urdu.
    pub title_ur: String,
    /// HTML body in English.
    pub description_en: String,
    /// HTML body in Urdu.
    pub description_ur: String,
    /// Visible to the public.
    pub is_published: bool,
    /// Pinned above other messages.
    pub at_top: bool,
    /// Shown as a notice banner.
    pub show_notice: bool,
    /// A push notification goes out on save.
    pub send_notification: bool,
    /// Ordered, at most [`MAX_MESSAGE_LINKS`] entries.
    pub links: Vec<MessageLink>,
}

/// Body of `POST /messages/add` and `PUT /messages/update/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(into = "MessageRecord")]
pub struct NewMessage {
    pub title_en: NonEmptyString,
    pub title_ur: NonEmptyString,
    /// Sanitized HTML.
    pub description_en: String,
    /// Sanitized HTML.
    pub description_ur: String,
    pub is_published: bool,
    pub at_top: bool,
    pub show_notice: bool,
    pub send_notification: bool,
    pub links: Vec<MessageLink>,
}

/// Wire shape with the four fixed `link_id_N` / `link_category_id_N` slots.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
struct MessageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<MessageId>,
    #[serde(default)]
    title_en: String,
    #[serde(default)]
    title_ur: String,
    #[serde(default)]
    description_en: Option<String>,
    #[serde(default)]
    description_ur: Option<String>,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    at_top: bool,
    #[serde(default)]
    show_notice: bool,
    #[serde(default)]
    send_notification: bool,
    #[serde(default)]
    link_id_1: Option<i32>,
    #[serde(default)]
    link_category_id_1: Option<i32>,
    #[serde(default)]
    link_id_2: Option<i32>,
    #[serde(default)]
    link_category_id_2: Option<i32>,
    #[serde(default)]
    link_id_3: Option<i32>,
    #[serde(default)]
    link_category_id_3: Option<i32>,
    #[serde(default)]
    link_id_4: Option<i32>,
    #[serde(default)]
    link_category_id_4: Option<i32>,
}

impl MessageRecord {
    fn links(&self) -> Vec<MessageLink> {
        [
            (self.link_category_id_1, self.link_id_1),
            (self.link_category_id_2, self.link_id_2),
            (self.link_category_id_3, self.link_id_3),
            (self.link_category_id_4, self.link_id_4),
        ]
        .into_iter()
        .filter_map(|slot| match slot {
            (Some(category_id), Some(link_id)) => Some(MessageLink {
                category_id,
                link_id,
            }),
            _ => None,
        })
        .collect()
    }

    fn set_links(&mut self, links: &[MessageLink]) {
        let mut slots = links.iter().take(MAX_MESSAGE_LINKS).map(|link| {
            (Some(link.category_id), Some(link.link_id))
        });
        let mut next = || slots.next().unwrap_or((None, None));
        (self.link_category_id_1, self.link_id_1) = next();
        (self.link_category_id_2, self.link_id_2) = next();
        (self.link_category_id_3, self.link_id_3) = next();
        (self.link_category_id_4, self.link_id_4) = next();
    }
}

impl TryFrom<MessageRecord> for Message {
    type Error = &'static str;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let links = record.links();
        let id = record.id.ok_or("message without id")?;
        Ok(Self {
            id,
            title_en: record.title_en,
            title_ur: record.title_ur,
            description_en: record.description_en.unwrap_or_default(),
            description_ur: record.description_ur.unwrap_or_default(),
            is_published: record.is_published,
            at_top: record.at_top,
            show_notice: record.show_notice,
            send_notification: record.send_notification,
            links,
        })
    }
}

impl From<Message> for MessageRecord {
    fn from(message: Message) -> Self {
        let mut record = MessageRecord {
            id: Some(message.id),
            title_en: message.title_en,
            title_ur: message.title_ur,
            description_en: Some(message.description_en),
            description_ur: Some(message.description_ur),
            is_published: message.is_published,
            at_top: message.at_top,
            show_notice: message.show_notice,
            send_notification: message.send_notification,
            ..MessageRecord::default()
        };
        record.set_links(&message.links);
        record
    }
}

impl From<NewMessage> for MessageRecord {
    fn from(message: NewMessage) -> Self {
        let mut record = MessageRecord {
            id: None,
            title_en: message.title_en.into_inner(),
            title_ur: message.title_ur.into_inner(),
            description_en: Some(message.description_en),
            description_ur: Some(message.description_ur),
            is_published: message.is_published,
            at_top: message.at_top,
            show_notice: message.show_notice,
            send_notification: message.send_notification,
            ..MessageRecord::default()
        };
        record.set_links(&message.links);
        record
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn slots_collapse_into_ordered_links() {
        let message: Message = serde_json::from_value(json!({
            "id": 5,
            "title_en": "Notice",
            "link_id_1": 10,
            "link_category_id_1": 1,
            "link_id_2": null,
            "link_category_id_2": 2,
            "link_id_3": 30,
            "link_category_id_3": 3
        }))
        .unwrap();

        assert_eq!(
            message.links,
            vec![
                MessageLink {
                    category_id: 1,
                    link_id: 10
                },
                MessageLink {
                    category_id: 3,
                    link_id: 30
                },
            ]
        );
        assert_eq!(message.description_en, "");
    }

    #[test]
    fn message_without_id_is_rejected() {
        let decoded = serde_json::from_value::<Message>(json!({"title_en": "Orphan"}));

        assert!(decoded.is_err());
    }

    #[test]
    fn links_are_written_into_leading_slots() {
        let payload = NewMessage {
            title_en: NonEmptyString::new("Urs").unwrap(),
            title_ur: NonEmptyString::new("عرس").unwrap(),
            description_en: "<p>Details</p>".to_string(),
            description_ur: String::new(),
            is_published: true,
            at_top: false,
            show_notice: true,
            send_notification: false,
            links: vec![MessageLink {
                category_id: 2,
                link_id: 44,
            }],
        };

        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["link_id_1"], json!(44));
        assert_eq!(value["link_category_id_1"], json!(2));
        assert_eq!(value["link_id_2"], json!(null));
        assert!(value.get("links").is_none());
        assert!(value.get("id").is_none());
    }
}
