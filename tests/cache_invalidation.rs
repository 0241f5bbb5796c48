use std::time::Instant;

use mehfil_admin::api::resources::Zones;
use mehfil_admin::api::{ApiClient, ListParams};
use mehfil_admin::cache::Tag;
use mehfil_admin::controller::ListController;
use mehfil_admin::controller::notify::Notification;
use mehfil_admin::domain::types::ZoneId;
use mehfil_admin::permissions::Capabilities;
use mehfil_admin::transport::{ApiRequest, Method};
use serde_json::json;

mod common;

use common::{RecordingTransport, page, zone};

#[test]
fn creating_a_zone_refetches_the_visible_list() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1))
        .ok(
            Method::Get,
            "/zones",
            page(vec![zone(1, "Karachi Zone"), zone(2, "Lahore Zone")], 2),
        )
        .ok(Method::Post, "/zones/add", zone(2, "Lahore Zone"));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.load(&mut client).unwrap();
    assert_eq!(controller.rows().len(), 1);

    controller.on_add().unwrap();
    let form = controller.draft_mut().unwrap();
    form.title_en = "Lahore Zone".into();
    form.title_ur = "لاہور زون".into();
    form.country_en = "Pakistan".into();
    form.country_ur = "پاکستان".into();
    form.city_en = "Lahore".into();
    form.city_ur = "لاہور".into();
    form.primary_phone_number = "03001234567".into();

    let created = controller.on_submit(&mut client).unwrap();

    let post = client.transport().last(Method::Post, "/zones/add").unwrap();
    let body = post.body.unwrap();
    assert_eq!(body["titleEn"], json!("Lahore Zone"));
    assert_eq!(body["primaryPhoneNumber"], json!("03001234567"));
    assert!(body.get("secondaryPhoneNumber").is_none());

    assert_eq!(created.map(|z| z.id.get()), Some(2));
    assert_eq!(
        controller.take_notifications(),
        vec![Notification::success("Zone created")]
    );
    assert!(!controller.modal().is_open());
    assert_eq!(client.transport().count(Method::Get, "/zones"), 2);
    assert_eq!(controller.rows().len(), 2);
    assert_eq!(controller.view().summary.total, 2);
}

#[test]
fn unsubscribed_stale_entries_wait_for_the_next_read() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1))
        .ok(Method::Delete, "/zones/1", json!({"success": true}));
    let mut client = ApiClient::new(transport);
    let params = ListParams::new(1, 10);
    let key = params.to_request("/zones").cache_key();

    client.list::<Zones>(&params).unwrap();
    client.delete::<Zones>(ZoneId::new(1).unwrap()).unwrap();

    assert_eq!(client.cache().is_stale(&key), Some(true));
    assert_eq!(client.transport().count(Method::Get, "/zones"), 1);

    client.list::<Zones>(&params).unwrap();

    assert_eq!(client.transport().count(Method::Get, "/zones"), 2);
    assert_eq!(client.cache().is_stale(&key), Some(false));
}

#[test]
fn subscribed_entries_refetch_immediately() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1))
        .ok(Method::Put, "/zones/update/1", zone(1, "Karachi Central"));
    let mut client = ApiClient::new(transport);
    let params = ListParams::new(1, 10);
    let request = params.to_request("/zones");
    client.subscribe(&request);

    client.list::<Zones>(&params).unwrap();
    client.mutate(
        &ApiRequest::put("/zones/update/1", json!({})),
        &[Tag::Id("Zone", 1), Tag::List("Zone")],
    )
    .unwrap();

    assert_eq!(client.transport().count(Method::Get, "/zones"), 2);
    assert_eq!(client.cache().is_stale(&request.cache_key()), Some(false));
}

#[test]
fn updating_one_entity_leaves_other_entities_fresh() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones/1", zone(1, "Karachi Zone"))
        .ok(Method::Get, "/zones/2", zone(2, "Lahore Zone"))
        .ok(Method::Put, "/zones/update/1", zone(1, "Karachi Central"));
    let mut client = ApiClient::new(transport);
    let first = ZoneId::new(1).unwrap();
    let second = ZoneId::new(2).unwrap();
    client.get_by_id::<Zones>(first).unwrap();
    client.get_by_id::<Zones>(second).unwrap();

    client
        .mutate(
            &ApiRequest::put("/zones/update/1", json!({})),
            &[Tag::Id("Zone", 1), Tag::List("Zone")],
        )
        .unwrap();

    assert_eq!(client.cache().is_stale("GET /zones/1"), Some(true));
    assert_eq!(client.cache().is_stale("GET /zones/2"), Some(false));
}

#[test]
fn failed_write_sends_no_refetch() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1))
        .respond(
            Method::Delete,
            "/zones/1",
            Err(mehfil_admin::transport::ApiError::Http {
                status: 500,
                message: None,
            }),
        );
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.load(&mut client).unwrap();
    let row = controller.rows()[0].clone();
    controller.on_delete(&row).unwrap();

    assert!(controller.on_confirm_delete(&mut client).is_err());

    assert_eq!(client.transport().count(Method::Get, "/zones"), 1);
    assert!(controller.modal().is_open());
    assert_eq!(
        controller.take_notifications(),
        vec![Notification::error("Failed to delete zone")]
    );
}

#[test]
fn refused_delete_leaves_the_list_fresh() {
    let transport = RecordingTransport::new()
        .ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1))
        .ok(Method::Delete, "/zones/1", json!({"success": false}));
    let mut client = ApiClient::new(transport);
    let params = ListParams::new(1, 10);
    let request = params.to_request("/zones");
    client.subscribe(&request);
    client.list::<Zones>(&params).unwrap();

    let deleted = client.delete::<Zones>(ZoneId::new(1).unwrap()).unwrap();

    assert!(!deleted);
    assert_eq!(client.transport().count(Method::Get, "/zones"), 1);
    assert_eq!(client.cache().is_stale(&request.cache_key()), Some(false));
}

#[test]
fn detached_screens_leave_nothing_cached() {
    let transport =
        RecordingTransport::new().ok(Method::Get, "/zones", page(vec![zone(1, "Karachi Zone")], 1));
    let mut client = ApiClient::new(transport);
    let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
    controller.load(&mut client).unwrap();

    for term in 0..50 {
        controller.on_search_change(format!("zone {term}"), Instant::now());
        assert!(controller.flush_search());
        controller.load(&mut client).unwrap();
        assert_eq!(client.cache().len(), 1);
    }
    assert_eq!(client.transport().count(Method::Get, "/zones"), 51);

    controller.detach(&mut client);

    assert!(client.cache().is_empty());
}
