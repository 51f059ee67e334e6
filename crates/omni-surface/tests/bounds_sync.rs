mod support;

use omni_common::Bounds;
use serde_json::json;
use support::Harness;

fn measure(h: &mut Harness, id: &str, left: f64, top: f64, width: f64, height: f64) {
    h.send(
        "view:measure",
        json!({
            "id": id,
            "rect": { "left": left, "top": top, "width": width, "height": height },
            "leftOffset": 0,
            "topOffset": 0
        }),
    );
}

fn set_bounds(h: &mut Harness, id: &str, b: Bounds) {
    h.send("view:set-bounds", json!({ "id": id, "bounds": b }));
}

#[test]
fn first_placement_is_pushed_immediately() {
    let mut h = Harness::new();
    h.create("v1");
    measure(&mut h, "v1", 0.0, 0.0, 640.0, 480.0);

    assert_eq!(h.bounds_applied("v1"), [Bounds::new(0, 0, 640, 480)]);
}

#[test]
fn bursts_within_the_window_apply_only_the_last() {
    let mut h = Harness::new();
    h.create("v1");
    set_bounds(&mut h, "v1", Bounds::new(0, 0, 100, 100));

    set_bounds(&mut h, "v1", Bounds::new(0, 0, 200, 200));
    h.advance(5);
    set_bounds(&mut h, "v1", Bounds::new(0, 0, 300, 300));
    h.advance(5);
    assert_eq!(h.bounds_applied("v1").len(), 1);

    h.advance(10);
    assert_eq!(
        h.bounds_applied("v1"),
        [Bounds::new(0, 0, 100, 100), Bounds::new(0, 0, 300, 300)]
    );
}

#[test]
fn measurement_before_create_is_applied_at_create() {
    let mut h = Harness::new();
    measure(&mut h, "v1", 10.5, 20.5, 300.0, 200.0);
    h.advance(20);
    h.create("v1");

    assert_eq!(h.bounds_applied("v1"), [Bounds::new(10, 20, 300, 200)]);
}

#[test]
fn configured_offsets_apply_when_measurement_has_none() {
    let mut h = Harness::new();
    h.create("v1");
    h.send(
        "view:measure",
        json!({ "id": "v1", "rect": { "left": 0, "top": 0, "width": 100, "height": 50 } }),
    );

    assert_eq!(h.bounds_applied("v1"), [Bounds::new(260, 48, 100, 50)]);
}

#[test]
fn inactive_view_is_parked_at_zero_size() {
    let mut h = Harness::new();
    h.create("v1");
    measure(&mut h, "v1", 0.0, 0.0, 100.0, 100.0);
    h.send(
        "view:measure",
        json!({
            "id": "v1",
            "rect": { "left": 0, "top": 0, "width": 100, "height": 100 },
            "active": false
        }),
    );
    h.advance(16);

    assert_eq!(h.bounds_applied("v1").last(), Some(&Bounds::hidden()));
    assert!(h.service.controller().contains(&omni_common::SurfaceId::from("v1")));
}

#[test]
fn unchanged_bounds_are_not_reapplied() {
    let mut h = Harness::new();
    h.create("v1");
    set_bounds(&mut h, "v1", Bounds::new(1, 1, 10, 10));
    set_bounds(&mut h, "v1", Bounds::new(1, 1, 10, 10));
    h.advance(20);

    assert_eq!(h.bounds_applied("v1").len(), 1);
}

#[test]
fn next_deadline_tracks_pending_flush() {
    let mut h = Harness::new();
    h.create("v1");
    set_bounds(&mut h, "v1", Bounds::new(0, 0, 10, 10));
    assert!(h.service.next_deadline().is_none());

    set_bounds(&mut h, "v1", Bounds::new(0, 0, 20, 20));
    let deadline = h.service.next_deadline().expect("flush scheduled");
    assert!(deadline > h.now);

    h.advance(16);
    assert!(h.service.next_deadline().is_none());
}

#[test]
fn destroy_cancels_pending_bounds() {
    let mut h = Harness::new();
    h.create("v1");
    set_bounds(&mut h, "v1", Bounds::new(0, 0, 10, 10));
    set_bounds(&mut h, "v1", Bounds::new(0, 0, 20, 20));
    h.destroy("v1");

    assert!(h.service.next_deadline().is_none());
    h.advance(50);
    assert_eq!(h.bounds_applied("v1"), [Bounds::new(0, 0, 10, 10)]);
}

#[test]
fn zero_area_set_bounds_is_floored() {
    let mut h = Harness::new();
    h.create("v1");
    set_bounds(&mut h, "v1", Bounds::new(5, 5, 0, 0));

    assert_eq!(h.bounds_applied("v1"), [Bounds::new(5, 5, 1, 1)]);
}

#[test]
fn inactive_overlay_state_parks_the_view() {
    let mut h = Harness::new();
    h.create("v1");
    measure(&mut h, "v1", 0.0, 0.0, 100.0, 100.0);
    h.send(
        "view:overlay-state",
        json!({ "id": "v1", "overlayActive": false, "active": false }),
    );
    h.advance(16);
    assert_eq!(
        h.bounds_applied("v1"),
        [Bounds::new(0, 0, 100, 100), Bounds::hidden()]
    );

    h.send(
        "view:overlay-state",
        json!({ "id": "v1", "overlayActive": false, "active": true }),
    );
    h.advance(16);
    assert_eq!(h.bounds_applied("v1").last(), Some(&Bounds::new(0, 0, 100, 100)));
}

#[test]
fn bounds_after_destroy_do_not_leak_into_recreate() {
    let mut h = Harness::new();
    h.create("v1");
    h.destroy("v1");
    set_bounds(&mut h, "v1", Bounds::new(1, 1, 10, 10));
    h.advance(1000);
    assert_eq!(h.service.tracked_bounds(), 0);

    h.create("v1");
    assert!(h.bounds_applied("v1").is_empty());
}

#[test]
fn unknown_ids_do_not_accumulate_geometry() {
    let mut h = Harness::new();
    for n in 0..1000 {
        set_bounds(&mut h, &format!("ghost-{n}"), Bounds::new(1, 1, 10, 10));
    }
    assert!(h.service.tracked_bounds() <= omni_surface::bounds::MAX_STAGED);

    h.create("ghost-5");
    assert!(h.bounds_applied("ghost-5").is_empty());
}
