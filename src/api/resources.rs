//! One [`Resource`] per backend collection, plus the writes that do not fit
//! plain create/update/delete.

use crate::api::{ApiClient, ListFilter, Resource};
use crate::cache::{Envelope, Tag};
use crate::domain::karkun::{ApprovalChange, KarkunJoinRequest, NewKarkunJoinRequest};
use crate::domain::khat::{AnswerQuestion, NewQuestion, Question};
use crate::domain::mehfil::{Mehfil, NewMehfil};
use crate::domain::message::{Message, NewMessage};
use crate::domain::naat_shareef::{NaatShareef, NewNaatShareef};
use crate::domain::tarteeb::{NewTarteebRequest, TarteebRequest};
use crate::domain::taxonomy::{Category, NewCategory, NewTag, Tag as NaatTag};
use crate::domain::types::{
    CategoryId, KarkunJoinRequestId, KhatId, MehfilId, MessageId, NaatShareefId, QuestionId,
    TagId, TarteebRequestId, TarteebStatus, UserType, ZoneId,
};
use crate::domain::zone::{NewZone, Zone};
use crate::permissions::ResourceKind;
use crate::transport::{ApiRequest, ApiResult, Transport};

fn flag(value: bool) -> String {
    String::from(if value { "true" } else { "false" })
}

macro_rules! resource {
    (
        $(#[$meta:meta])*
        $name:ident {
            id: $id:ty,
            entity: $entity:ty,
            payload: $payload:ty,
            filter: $filter:ty,
            path: $path:expr,
            tag: $tag:expr,
            label: $label:expr,
            kind: $kind:expr,
            envelope: $envelope:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $name;

        impl Resource for $name {
            type Id = $id;
            type Entity = $entity;
            type Payload = $payload;
            type Filter = $filter;

            const PATH: &'static str = $path;
            const TAG: &'static str = $tag;
            const LABEL: &'static str = $label;
            const KIND: ResourceKind = $kind;
            const ENVELOPE: Envelope = $envelope;
        }
    };
}

resource!(
    /// `/zones`; get-by-id returns the bare entity.
    Zones {
        id: ZoneId,
        entity: Zone,
        payload: NewZone,
        filter: (),
        path: "/zones",
        tag: "Zone",
        label: "Zone",
        kind: ResourceKind::Zones,
        envelope: Envelope::Bare,
    }
);

resource!(
    Mehfils {
        id: MehfilId,
        entity: Mehfil,
        payload: NewMehfil,
        filter: PublishedFilter,
        path: "/mehfils",
        tag: "Mehfil",
        label: "Mehfil",
        kind: ResourceKind::Mehfils,
        envelope: Envelope::Data,
    }
);

resource!(
    NaatShareefs {
        id: NaatShareefId,
        entity: NaatShareef,
        payload: NewNaatShareef,
        filter: NaatShareefFilter,
        path: "/naat-shareefs",
        tag: "NaatShareef",
        label: "Naat Shareef",
        kind: ResourceKind::NaatShareefs,
        envelope: Envelope::Data,
    }
);

resource!(
    Messages {
        id: MessageId,
        entity: Message,
        payload: NewMessage,
        filter: PublishedFilter,
        path: "/messages",
        tag: "Message",
        label: "Message",
        kind: ResourceKind::Messages,
        envelope: Envelope::Data,
    }
);

resource!(
    KarkunJoinRequests {
        id: KarkunJoinRequestId,
        entity: KarkunJoinRequest,
        payload: NewKarkunJoinRequest,
        filter: KarkunJoinRequestFilter,
        path: "/karkun-join-requests",
        tag: "KarkunJoinRequest",
        label: "Join request",
        kind: ResourceKind::KarkunJoinRequests,
        envelope: Envelope::Data,
    }
);

resource!(
    TarteebRequests {
        id: TarteebRequestId,
        entity: TarteebRequest,
        payload: NewTarteebRequest,
        filter: TarteebRequestFilter,
        path: "/tarteeb-requests",
        tag: "TarteebRequest",
        label: "Tarteeb request",
        kind: ResourceKind::TarteebRequests,
        envelope: Envelope::Data,
    }
);

resource!(
    Tags {
        id: TagId,
        entity: NaatTag,
        payload: NewTag,
        filter: (),
        path: "/tags",
        tag: "Tag",
        label: "Tag",
        kind: ResourceKind::Tags,
        envelope: Envelope::Bare,
    }
);

resource!(
    Categories {
        id: CategoryId,
        entity: Category,
        payload: NewCategory,
        filter: (),
        path: "/categories",
        tag: "Category",
        label: "Category",
        kind: ResourceKind::Categories,
        envelope: Envelope::Bare,
    }
);

resource!(
    /// Follow-up questions of a khat.
    Questions {
        id: QuestionId,
        entity: Question,
        payload: NewQuestion,
        filter: QuestionFilter,
        path: "/questions",
        tag: "Question",
        label: "Question",
        kind: ResourceKind::Khat,
        envelope: Envelope::Bare,
    }
);

/// Filter for resources with a publish switch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishedFilter {
    pub is_published: Option<bool>,
}

impl ListFilter for PublishedFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.is_published
            .map(|published| vec![("is_published", flag(published))])
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NaatShareefFilter {
    pub category_id: Option<CategoryId>,
}

impl ListFilter for NaatShareefFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.category_id
            .map(|id| vec![("category_id", id.to_string())])
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KarkunJoinRequestFilter {
    pub user_type: Option<UserType>,
    pub is_approved: Option<bool>,
}

impl ListFilter for KarkunJoinRequestFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(user_type) = self.user_type {
            pairs.push(("user_type", user_type.as_str().to_string()));
        }
        if let Some(approved) = self.is_approved {
            pairs.push(("is_approved", flag(approved)));
        }
        pairs
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TarteebRequestFilter {
    pub status: Option<TarteebStatus>,
}

impl ListFilter for TarteebRequestFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub khat_id: Option<KhatId>,
    pub answered: Option<bool>,
}

impl ListFilter for QuestionFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(khat_id) = self.khat_id {
            pairs.push(("khat_id", khat_id.to_string()));
        }
        if let Some(answered) = self.answered {
            pairs.push(("answered", flag(answered)));
        }
        pairs
    }
}

impl<T: Transport> ApiClient<T> {
    /// Flips the approval flag of a join request and nothing else.
    pub fn approve_join_request(
        &mut self,
        id: KarkunJoinRequestId,
        is_approved: bool,
    ) -> ApiResult<()> {
        let request = ApiRequest::put(
            format!("{}/update/{id}", KarkunJoinRequests::PATH),
            serde_json::to_value(ApprovalChange { is_approved })?,
        );
        let tag = KarkunJoinRequests::TAG;
        self.mutate(&request, &[Tag::Id(tag, id.get()), Tag::List(tag)])?;
        Ok(())
    }

    /// Stores the answer to a khat question.
    pub fn answer_question(&mut self, id: QuestionId, answer: &AnswerQuestion) -> ApiResult<()> {
        let request = ApiRequest::put(
            format!("{}/update/{id}", Questions::PATH),
            serde_json::to_value(answer)?,
        );
        let tag = Questions::TAG;
        self.mutate(&request, &[Tag::Id(tag, id.get()), Tag::List(tag)])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::api::ListParams;
    use crate::domain::types::NonEmptyString;
    use crate::transport::mock::MockTransport;

    #[test]
    fn filters_are_appended_to_list_requests() {
        let params = ListParams::new(2, 25)
            .search(" ali ")
            .filter(KarkunJoinRequestFilter {
                user_type: Some(UserType::Mureed),
                is_approved: Some(false),
            });

        let request = params.to_request(KarkunJoinRequests::PATH);

        assert_eq!(
            request.cache_key(),
            "GET /karkun-join-requests?is_approved=false&page=2&search=ali&size=25&user_type=mureed"
        );
    }

    #[test]
    fn approval_sends_only_the_flag() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .with(eq(ApiRequest::put(
                "/karkun-join-requests/update/12",
                json!({"is_approved": true}),
            )))
            .times(1)
            .returning(|_| Ok(json!({"data": {"id": 12, "is_approved": true}})));
        let mut client = ApiClient::new(transport);

        let id = KarkunJoinRequestId::new(12).unwrap();
        client.approve_join_request(id, true).unwrap();
    }

    #[test]
    fn answer_is_put_to_update_endpoint() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .with(eq(ApiRequest::put(
                "/questions/update/3",
                json!({"answer": "Recite daily"}),
            )))
            .times(1)
            .returning(|_| Ok(json!({"id": 3})));
        let mut client = ApiClient::new(transport);

        let answer = AnswerQuestion {
            answer: NonEmptyString::new("Recite daily").unwrap(),
        };
        client
            .answer_question(QuestionId::new(3).unwrap(), &answer)
            .unwrap();
    }

    #[test]
    fn options_request_a_large_first_page() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path == "/categories"
                    && req.query.contains(&("size".to_string(), "500".to_string()))
                    && req.query.contains(&("page".to_string(), "1".to_string()))
            })
            .times(1)
            .returning(|_| Ok(json!([{"id": 1, "title_en": "Hamd"}])));
        let mut client = ApiClient::new(transport);

        let categories = client.options::<Categories>().unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].title_en, "Hamd");
    }
}
