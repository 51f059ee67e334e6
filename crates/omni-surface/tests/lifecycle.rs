mod support;

use omni_common::{ConnectionId, SurfaceId};
use omni_surface::{Channel, HostMessage, Partition};
use serde_json::json;
use support::{Call, Harness, CONN, OTHER_CONN};

#[test]
fn create_twice_yields_one_surface() {
    let mut h = Harness::new();
    h.create("v1");
    h.create("v1");

    assert_eq!(h.service.controller().len(), 1);
    assert_eq!(h.state().live, 1);
    let creates = h
        .calls("v1")
        .into_iter()
        .filter(|c| matches!(c, Call::Create(_)))
        .count();
    assert_eq!(creates, 1);
}

#[test]
fn destroy_unknown_id_is_a_no_op() {
    let mut h = Harness::new();
    h.create("keep");
    h.destroy("ghost");

    assert!(h.service.controller().contains(&SurfaceId::from("keep")));
    assert_eq!(h.state().live, 1);
    assert!(h.calls("ghost").is_empty());
}

#[test]
fn destroy_twice_releases_once() {
    let mut h = Harness::new();
    h.create("v1");
    h.destroy("v1");
    h.destroy("v1");

    let releases = h
        .calls("v1")
        .into_iter()
        .filter(|c| *c == Call::Release)
        .count();
    assert_eq!(releases, 1);
    assert_eq!(h.state().live, 0);
}

#[test]
fn set_bounds_after_destroy_has_no_effect() {
    let mut h = Harness::new();
    h.create("v1");
    h.destroy("v1");
    let before = h.calls("v1").len();

    h.send(
        "view:set-bounds",
        json!({ "id": "v1", "bounds": { "x": 1, "y": 2, "width": 3, "height": 4 } }),
    );
    h.advance(50);

    assert_eq!(h.calls("v1").len(), before);
}

#[test]
fn destroy_releases_before_the_entry_is_removed() {
    let mut h = Harness::new();
    h.create("v1");
    h.destroy("v1");

    let calls = h.calls("v1");
    let tail: Vec<&Call> = calls.iter().rev().take(3).rev().collect();
    assert_eq!(tail, [&Call::Detach, &Call::Dispose, &Call::Release]);
    assert!(!h.service.controller().contains(&SurfaceId::from("v1")));
    assert!(h.state().sinks.is_empty());
}

#[test]
fn create_without_window_is_an_attach_error() {
    let mut h = Harness::new();
    let stranger = ConnectionId(77);
    h.service.sender().host_raw(
        stranger,
        &json!({ "kind": "view:create", "requestId": 5, "payload": { "id": "v1" } }).to_string(),
    );
    h.pump();

    assert!(h.service.controller().is_empty());
    assert_eq!(h.state().live, 0);
    assert!(!h.service.relay().has_entry(Channel::PageInfo, &SurfaceId::from("v1")));
    assert!(!h.service.relay().has_entry(Channel::Loading, &SurfaceId::from("v1")));

    let out = h.outbound();
    assert_eq!(out.len(), 1);
    match &out[0] {
        (conn, HostMessage::Reply { request_id, ok, error, .. }) => {
            assert_eq!(*conn, stranger);
            assert_eq!(*request_id, 5);
            assert!(!ok);
            assert!(error.as_deref().unwrap().contains("no window"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn host_refusal_is_an_attach_error() {
    let mut h = Harness::new();
    h.state().refuse_create = true;
    h.request("view:create", 1, json!({ "id": "v1" }));

    assert!(h.service.controller().is_empty());
    assert!(matches!(
        h.messages().as_slice(),
        [HostMessage::Reply { ok: false, .. }]
    ));
}

#[test]
fn create_reply_is_ok_and_idempotent() {
    let mut h = Harness::new();
    h.request("view:create", 1, json!({ "id": "v1" }));
    h.request("view:create", 2, json!({ "id": "v1" }));

    let replies: Vec<(u64, bool)> = h
        .messages()
        .into_iter()
        .filter_map(|m| match m {
            HostMessage::Reply { request_id, ok, .. } => Some((request_id, ok)),
            _ => None,
        })
        .collect();
    assert_eq!(replies, [(1, true), (2, true)]);
}

#[test]
fn partition_comes_from_request_or_settings() {
    let mut h = Harness::with_settings(omni_surface::ServiceSettings {
        default_partition: Some("persist:main".into()),
        ..Default::default()
    });
    h.create("a");
    h.send("view:create", json!({ "id": "b", "partition": "scratch" }));

    assert_eq!(h.calls("a")[0], Call::Create(Partition::Persistent("main".into())));
    assert_eq!(h.calls("b")[0], Call::Create(Partition::Ephemeral("scratch".into())));
}

#[test]
fn requests_from_a_non_owner_are_ignored() {
    let mut h = Harness::new();
    h.create("v1");
    h.send_from(OTHER_CONN, "view:destroy", json!({ "id": "v1" }));
    h.send_from(OTHER_CONN, "view:load", json!({ "id": "v1", "url": "https://x.test" }));

    assert!(h.service.controller().contains(&SurfaceId::from("v1")));
    assert!(!h.calls("v1").iter().any(|c| matches!(c, Call::Load(_))));
    assert_eq!(h.service.controller().owner_of(&SurfaceId::from("v1")), Some(CONN));
}

#[test]
fn shutdown_destroys_every_surface() {
    let mut h = Harness::new();
    h.create("a");
    h.create("b");
    h.create("c");

    h.service.shutdown();
    assert!(h.service.controller().is_empty());
    assert_eq!(h.state().live, 0);
    for id in ["a", "b", "c"] {
        assert_eq!(h.calls(id).last(), Some(&Call::Release));
    }
}

#[test]
fn disconnect_drops_only_that_connections_surfaces() {
    let mut h = Harness::new();
    h.create("mine");
    h.send_from(OTHER_CONN, "view:create", json!({ "id": "theirs" }));

    assert_eq!(h.service.disconnect(CONN), 1);
    assert!(!h.service.controller().contains(&SurfaceId::from("mine")));
    assert!(h.service.controller().contains(&SurfaceId::from("theirs")));
}

#[test]
fn recreate_after_destroy_allocates_a_fresh_surface() {
    let mut h = Harness::new();
    h.create("v1");
    h.destroy("v1");
    h.create("v1");

    assert_eq!(h.state().live, 1);
    assert!(h.service.controller().contains(&SurfaceId::from("v1")));
}
