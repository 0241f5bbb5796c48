use mehfil_admin::api::ApiClient;
use mehfil_admin::api::resources::{
    KarkunJoinRequestFilter, KarkunJoinRequests, Questions, TarteebRequests, Zones,
};
use mehfil_admin::controller::notify::Notification;
use mehfil_admin::controller::{ControllerError, ListController};
use mehfil_admin::domain::types::{KarkunJoinRequestId, Prayer, QuestionId, UserType};
use mehfil_admin::forms::khat::AnswerForm;
use mehfil_admin::permissions::{Action, Capabilities, ResourceKind};
use mehfil_admin::transport::Method;
use serde_json::json;

mod common;

use common::{RecordingTransport, page, zone};

fn zone_viewer() -> Capabilities {
    Capabilities::none().allow(Action::View, ResourceKind::Zones)
}

#[test]
fn delete_without_permission_sends_nothing() {
    let transport =
        RecordingTransport::new().ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.load(&mut client).unwrap();
    let row = controller.rows()[0].clone();
    controller.on_delete(&row).unwrap();

    controller.set_capabilities(zone_viewer());
    let result = controller.on_confirm_delete(&mut client);

    assert!(matches!(result, Err(ControllerError::Forbidden(_))));
    assert_eq!(client.transport().count(Method::Delete, "/zones/1"), 0);
    assert!(!controller.view().can_delete);
}

#[test]
fn submit_without_permission_sends_nothing() {
    let mut client = ApiClient::new(RecordingTransport::new());
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.on_add().unwrap();

    controller.set_capabilities(zone_viewer());

    assert!(matches!(
        controller.on_submit(&mut client),
        Err(ControllerError::Forbidden(_))
    ));
    assert!(client.transport().sent().is_empty());
}

#[test]
fn approve_without_permission_sends_nothing() {
    let mut client = ApiClient::new(RecordingTransport::new());
    let caps = Capabilities::none().allow(Action::View, ResourceKind::KarkunJoinRequests);
    let mut controller = ListController::<KarkunJoinRequests>::new(caps);

    let id = KarkunJoinRequestId::new(5).unwrap();

    assert!(matches!(
        controller.on_approve(&mut client, id, true),
        Err(ControllerError::Forbidden(_))
    ));
    assert!(client.transport().sent().is_empty());
    assert!(!controller.view().can_approve);
}

#[test]
fn listing_requires_view_permission() {
    let mut client = ApiClient::new(RecordingTransport::new());
    let mut controller = ListController::<Zones>::new(Capabilities::none());

    assert!(matches!(
        controller.load(&mut client),
        Err(ControllerError::Forbidden(_))
    ));
    assert!(client.transport().sent().is_empty());
}

#[test]
fn deleting_refreshes_the_list() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone"), zone(2, "Lahore Zone")], 2))
        .ok(Method::Get, "/zones", page(vec![zone(2, "Lahore Zone")], 1))
        .ok(Method::Delete, "/zones/1", json!({"success": true}));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.load(&mut client).unwrap();
    let row = controller.rows()[0].clone();
    controller.on_delete(&row).unwrap();

    assert!(controller.on_confirm_delete(&mut client).unwrap());

    assert!(!controller.modal().is_open());
    assert_eq!(controller.rows().len(), 1);
    assert_eq!(
        controller.take_notifications(),
        vec![Notification::success("Zone deleted")]
    );
}

#[test]
fn refused_delete_keeps_the_dialog_open() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1))
        .ok(Method::Delete, "/zones/1", json!({"success": false}));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.load(&mut client).unwrap();
    let row = controller.rows()[0].clone();
    controller.on_delete(&row).unwrap();

    assert!(!controller.on_confirm_delete(&mut client).unwrap());

    assert!(controller.modal().is_open());
    assert!(controller.take_notifications()[0].is_error());
}

#[test]
fn deleting_the_last_row_of_the_last_page_steps_back() {
    let rows: Vec<_> = (1..=10).map(|id| zone(id, "Zone")).collect();
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(11, "Zone")], 11))
        .ok(Method::Get, "/zones", page(vec![], 10))
        .ok(Method::Get, "/zones", page(rows, 10))
        .ok(Method::Delete, "/zones/11", json!({"success": true}));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.on_page_change(2);
    controller.load(&mut client).unwrap();
    let row = controller.rows()[0].clone();
    controller.on_delete(&row).unwrap();

    controller.on_confirm_delete(&mut client).unwrap();

    assert_eq!(controller.page(), 1);
    assert_eq!(controller.rows().len(), 10);
}

#[test]
fn filter_change_resets_page_and_reaches_the_query() {
    let transport = RecordingTransport::new().ok(Method::Get, "/karkun-join-requests", page(vec![], 0));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<KarkunJoinRequests>::new(Capabilities::super_admin());
    controller.on_page_change(3);

    let changed = controller.on_filter_change(KarkunJoinRequestFilter {
        user_type: Some(UserType::Karkun),
        is_approved: Some(false),
    });
    controller.load(&mut client).unwrap();

    assert!(changed);
    assert_eq!(controller.page(), 1);
    let sent = client
        .transport()
        .last(Method::Get, "/karkun-join-requests")
        .unwrap();
    assert!(sent.query.contains(&("user_type".to_string(), "karkun".to_string())));
    assert!(sent.query.contains(&("is_approved".to_string(), "false".to_string())));
    assert!(sent.query.contains(&("page".to_string(), "1".to_string())));
}

#[test]
fn approving_sends_only_the_flag_and_toasts() {
    let transport = RecordingTransport::new()
        .ok(
            Method::Put,
            "/karkun-join-requests/update/5",
            json!({"data": {"id": 5, "is_approved": true}}),
        );
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<KarkunJoinRequests>::new(Capabilities::super_admin());

    controller
        .on_approve(&mut client, KarkunJoinRequestId::new(5).unwrap(), true)
        .unwrap();

    let sent = client
        .transport()
        .last(Method::Put, "/karkun-join-requests/update/5")
        .unwrap();
    assert_eq!(sent.body, Some(json!({"is_approved": true})));
    assert_eq!(
        controller.take_notifications(),
        vec![Notification::success("Join request approved")]
    );
}

#[test]
fn blank_answer_is_not_sent() {
    let mut client = ApiClient::new(RecordingTransport::new());
    let mut controller = ListController::<Questions>::new(Capabilities::super_admin());
    let form = AnswerForm {
        answer: "   ".into(),
    };

    let result = controller.on_answer(&mut client, QuestionId::new(3).unwrap(), &form);

    assert!(matches!(result, Err(ControllerError::Form(_))));
    assert!(client.transport().sent().is_empty());
    assert_eq!(
        controller.form_errors(),
        &[("answer".to_string(), "Answer is required".to_string())]
    );
}

#[test]
fn consistent_tarteeb_form_never_submits_missed_prayers() {
    let transport = RecordingTransport::new().ok(
        Method::Post,
        "/tarteeb-requests/add",
        json!({"data": {"id": 8, "full_name": "Ahmed Khan"}}),
    );
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<TarteebRequests>::new(Capabilities::super_admin());
    controller.on_add().unwrap();
    let form = controller.draft_mut().unwrap();
    form.full_name = "Ahmed Khan".into();
    form.phone_number = "03211234567".into();
    assert!(form.toggle_missed_prayer(Prayer::Fajr));
    form.set_prayers_consistent(true);
    assert!(!form.toggle_missed_prayer(Prayer::Asr));

    controller.on_submit(&mut client).unwrap();

    let body = client
        .transport()
        .last(Method::Post, "/tarteeb-requests/add")
        .unwrap()
        .body
        .unwrap();
    assert_eq!(body["prayers_consistent"], json!(true));
    assert_eq!(body["missed_prayers"], json!([]));
    assert_eq!(
        controller.take_notifications(),
        vec![Notification::success("Tarteeb request created")]
    );
}
