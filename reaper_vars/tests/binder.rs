mod common;

use common::{cardinality, text, RecordingSink};
use reaper_vars::catalog::{self, catalog_len};
use reaper_vars::protocol::{DisplayValue, ObjectPath, Property, RawValue};
use reaper_vars::{BinderError, DeviceError, LocateError, ObservationBinder, Reaper};

fn bound(tracks: u16, fx: u16) -> (Reaper, ObservationBinder<RecordingSink>) {
    let mut root = Reaper::with_cardinality(tracks.into(), fx.into());
    let mut binder = ObservationBinder::new(cardinality(tracks, fx), RecordingSink::default());
    let report = binder.bind(&mut root).expect("first bind");
    assert!(report.failures.is_empty());
    (root, binder)
}

#[test]
fn bind_declares_catalog_and_subscribes_every_entry() {
    let (root, binder) = bound(2, 1);
    let len = catalog_len(cardinality(2, 1));

    assert!(binder.is_bound());
    assert_eq!(binder.subscription_count(), len);
    assert_eq!(root.subscription_count(), len);
    assert_eq!(binder.sink().declarations.len(), 1);
    assert_eq!(
        binder.sink().declarations[0],
        catalog::declarations(binder.variables())
    );
    assert!(binder.sink().updates.is_empty());
}

#[test]
fn each_change_is_forwarded_transformed() {
    let (mut root, mut binder) = bound(2, 1);

    root.track_mut(0).unwrap().set_muted(true);
    root.transport_mut().set_time(65.25);
    root.track_mut(1).unwrap().fx_mut(0).unwrap().set_name("ReaEQ");
    let stats = binder.dispatch(&root);

    assert_eq!(stats.notifications, 3);
    assert_eq!(stats.updates, 3);
    let sink = binder.sink();
    assert_eq!(sink.ids(), ["track1Mute", "time", "track2Fx1Name"]);
    assert_eq!(sink.last("track1Mute"), Some(text("Muted")));
    assert_eq!(sink.last("time"), Some(text("1:05.250")));
    assert_eq!(sink.last("track2Fx1Name"), Some(text("ReaEQ")));
}

#[test]
fn one_property_can_feed_several_variables() {
    let (mut root, mut binder) = bound(1, 1);

    root.track_mut(0).unwrap().set_vu(0.5);
    binder.dispatch(&root);

    let sink = binder.sink();
    assert_eq!(sink.last("track1vu"), Some(DisplayValue::Number(50.0)));
    assert_eq!(sink.last("track1vu_db"), Some(DisplayValue::Number(-24.0)));
    assert_eq!(sink.updates.len(), 2);
}

#[test]
fn metronome_flag_comes_from_root() {
    let (mut root, mut binder) = bound(1, 1);

    root.set_metronome_enabled(true);
    binder.dispatch(&root);
    root.set_metronome_enabled(false);
    binder.dispatch(&root);

    assert_eq!(
        binder.sink().values_for("clickStatus"),
        [text("Active"), text("Inactive")]
    );
}

#[test]
fn unchanged_values_do_not_notify() {
    let (mut root, mut binder) = bound(1, 1);

    assert!(!root.track_mut(0).unwrap().set_muted(false));
    assert!(!root.transport_mut().set_stopped(true));
    let stats = binder.dispatch(&root);

    assert_eq!(stats.notifications, 0);
    assert!(binder.sink().updates.is_empty());
}

#[test]
fn bursts_are_not_coalesced() {
    let (mut root, mut binder) = bound(1, 1);

    for t in [1.0, 2.0, 3.0] {
        root.transport_mut().set_time(t);
        binder.dispatch(&root);
    }
    assert_eq!(
        binder.sink().values_for("time"),
        [text("0:01.000"), text("0:02.000"), text("0:03.000")]
    );

    // Queued without dispatching in between: still one update per change,
    // each reading the graph as it is when dispatched.
    root.transport_mut().set_time(4.0);
    root.transport_mut().set_time(5.0);
    let stats = binder.dispatch(&root);
    assert_eq!(stats.updates, 2);
    assert_eq!(binder.sink().values_for("time").len(), 5);
}

#[test]
fn unbind_releases_all_subscriptions() {
    let (mut root, mut binder) = bound(3, 2);
    let len = catalog_len(cardinality(3, 2));

    assert_eq!(binder.unbind(&mut root), Ok(len));
    assert!(!binder.is_bound());
    assert_eq!(root.subscription_count(), 0);

    root.transport_mut().set_playing(true);
    root.track_mut(2).unwrap().set_soloed(true);
    let stats = binder.dispatch(&root);
    assert_eq!(stats.notifications, 0);
    assert!(binder.sink().updates.is_empty());
}

#[test]
fn double_unbind_is_a_reported_noop() {
    let (mut root, mut binder) = bound(1, 1);

    assert!(binder.unbind(&mut root).is_ok());
    assert_eq!(binder.unbind(&mut root), Err(BinderError::NotBound));
    assert_eq!(binder.unbind(&mut root), Err(BinderError::NotBound));

    assert!(!binder.is_bound());
    assert_eq!(binder.sink().declarations.len(), 1);
    assert!(binder.sink().updates.is_empty());
}

#[test]
fn double_bind_is_a_reported_noop() {
    let (mut root, mut binder) = bound(1, 1);
    let len = catalog_len(cardinality(1, 1));

    assert_eq!(binder.bind(&mut root), Err(BinderError::AlreadyBound));
    assert!(binder.is_bound());
    assert_eq!(root.subscription_count(), len);
    assert_eq!(binder.sink().declarations.len(), 1);

    root.track_mut(0).unwrap().set_selected(true);
    binder.dispatch(&root);
    assert_eq!(binder.sink().values_for("track1Select"), [text("Selected")]);
}

#[test]
fn bind_unbind_bind_yields_same_catalog() {
    let (mut root, mut binder) = bound(4, 2);
    binder.unbind(&mut root).unwrap();
    binder.bind(&mut root).unwrap();

    let decls = &binder.sink().declarations;
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0], decls[1]);
    assert_eq!(root.subscription_count(), catalog_len(cardinality(4, 2)));
}

#[test]
fn queued_notifications_are_dropped_by_unbind() {
    let (mut root, mut binder) = bound(1, 1);

    root.track_mut(0).unwrap().set_record_armed(true);
    binder.unbind(&mut root).unwrap();
    binder.bind(&mut root).unwrap();
    let stats = binder.dispatch(&root);

    assert_eq!(stats.notifications, 0);
    assert!(binder.sink().updates.is_empty());
}

#[test]
fn missing_tracks_and_fx_fail_per_entry() {
    let mut root = Reaper::with_cardinality(1, 1);
    let mut binder = ObservationBinder::new(cardinality(2, 2), RecordingSink::default());
    let report = binder.bind(&mut root).unwrap();

    // track 1 fx 2 (3 entries) and all of track 2 (9 + 2 * 3)
    assert_eq!(report.failures.len(), 18);
    assert_eq!(report.bound, catalog_len(cardinality(2, 2)) - 18);

    let failure = |id: &str| {
        report
            .failures
            .iter()
            .find(|f| f.variable_id == id)
            .map(|f| f.error.clone())
    };
    assert_eq!(failure("track2Mute"), Some(LocateError::TrackMissing(1)));
    assert_eq!(
        failure("track1Fx2Bypass"),
        Some(LocateError::FxMissing { track: 0, fx: 1 })
    );
    assert_eq!(failure("track1Fx1Bypass"), None);

    // The full catalog is still declared, and bound entries keep working.
    assert_eq!(
        binder.sink().declarations[0].len(),
        catalog_len(cardinality(2, 2))
    );
    root.track_mut(0).unwrap().fx_mut(0).unwrap().set_bypassed(true);
    binder.dispatch(&root);
    assert_eq!(binder.sink().last("track1Fx1Bypass"), Some(text("Active")));
}

#[test]
fn a_failing_variable_does_not_block_the_rest() {
    let (mut root, mut binder) = bound(2, 1);

    root.track_mut(0).unwrap().set_vu(f64::NAN);
    root.track_mut(1).unwrap().set_muted(true);
    root.track_mut(0).unwrap().set_name("Drums");
    let stats = binder.dispatch(&root);

    assert_eq!(stats.notifications, 4);
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.updates, 2);

    let sink = binder.sink();
    assert!(sink.values_for("track1vu").is_empty());
    assert!(sink.values_for("track1vu_db").is_empty());
    assert_eq!(sink.last("track2Mute"), Some(text("Muted")));
    assert_eq!(sink.last("track1Name"), Some(text("Drums")));

    // Recovers on the next good reading.
    root.track_mut(0).unwrap().set_vu(1.0);
    binder.dispatch(&root);
    assert_eq!(binder.sink().last("track1vu_db"), Some(DisplayValue::Number(12.0)));
}

#[test]
fn publish_all_pushes_current_state() {
    let (mut root, mut binder) = bound(1, 1);
    root.track_mut(0).unwrap().set_volume_db(-6.06);
    binder.dispatch(&root);
    binder.sink_mut().updates.clear();

    let stats = binder.publish_all(&root).unwrap();
    assert_eq!(stats.updates, catalog_len(cardinality(1, 1)));

    let sink = binder.sink();
    assert_eq!(sink.updates[0].0, "playStatus");
    assert_eq!(sink.last("playStatus"), Some(text("Paused")));
    assert_eq!(sink.last("stopStatus"), Some(text("Stopped")));
    assert_eq!(sink.last("time"), Some(text("0:00.000")));
    assert_eq!(sink.last("frames"), Some(DisplayValue::Number(0.0)));
    assert_eq!(sink.last("track1vu_db"), Some(DisplayValue::Number(-60.0)));
    assert_eq!(sink.last("track1volume_db"), Some(DisplayValue::Number(-6.1)));
    assert_eq!(sink.last("track1Fx1Bypass"), Some(text("Bypassed")));
    assert_eq!(sink.last("track1Fx1Openui"), Some(text("Closed")));
}

#[test]
fn publish_all_requires_binding() {
    let root = Reaper::with_cardinality(1, 1);
    let mut binder = ObservationBinder::new(cardinality(1, 1), RecordingSink::default());
    assert_eq!(binder.publish_all(&root), Err(BinderError::NotBound));
}

#[test]
fn unbinding_against_another_graph_does_not_leak() {
    let (mut a, mut binder) = bound(1, 1);
    let len = catalog_len(cardinality(1, 1));
    let mut b = Reaper::with_cardinality(1, 1);

    assert_eq!(binder.unbind(&mut b), Ok(0));
    assert_eq!(a.subscription_count(), len);

    // Dead registrations are dropped on the next notify of their property.
    a.track_mut(0).unwrap().set_muted(true);
    assert_eq!(a.subscription_count(), len - 1);
    a.track_mut(0).unwrap().set_vu(0.3);
    assert_eq!(a.subscription_count(), len - 3);
}

#[test]
fn independent_binders_share_a_graph() {
    let mut root = Reaper::with_cardinality(1, 1);
    let mut first = ObservationBinder::new(cardinality(1, 1), RecordingSink::default());
    let mut second = ObservationBinder::new(cardinality(1, 1), RecordingSink::default());
    first.bind(&mut root).unwrap();
    second.bind(&mut root).unwrap();

    root.transport_mut().set_recording(true);
    first.dispatch(&root);
    second.dispatch(&root);
    assert_eq!(first.sink().last("recordStatus"), Some(text("Recording")));
    assert_eq!(second.sink().last("recordStatus"), Some(text("Recording")));

    first.unbind(&mut root).unwrap();
    root.transport_mut().set_recording(false);
    first.dispatch(&root);
    second.dispatch(&root);
    assert_eq!(first.sink().values_for("recordStatus").len(), 1);
    assert_eq!(second.sink().last("recordStatus"), Some(text("Not Recording")));
}

#[test]
fn rebind_switches_cardinality() {
    let (mut root, mut binder) = bound(1, 1);
    root.push_track().push_fx();

    let report = binder.rebind(&mut root, cardinality(2, 1)).unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(binder.cardinality(), cardinality(2, 1));
    assert_eq!(binder.sink().declarations.len(), 2);
    assert_eq!(
        binder.sink().declarations[1].len(),
        catalog_len(cardinality(2, 1))
    );
    assert_eq!(root.subscription_count(), catalog_len(cardinality(2, 1)));

    root.track_mut(1).unwrap().fx_mut(0).unwrap().set_ui_open(true);
    binder.dispatch(&root);
    assert_eq!(binder.sink().last("track2Fx1Openui"), Some(text("Open")));
}

#[test]
fn cardinality_cannot_change_while_bound() {
    let (_root, mut binder) = bound(1, 1);
    assert_eq!(
        binder.set_cardinality(cardinality(2, 2)),
        Err(BinderError::AlreadyBound)
    );
    assert_eq!(binder.cardinality(), cardinality(1, 1));
}

#[test]
fn remote_updates_are_type_checked() {
    let (mut root, mut binder) = bound(1, 1);

    assert_eq!(
        root.apply(ObjectPath::Track(0), Property::IsMuted, RawValue::Number(1.0)),
        Err(DeviceError::WrongKind {
            property: Property::IsMuted,
            expected: "bool",
            got: "number"
        })
    );
    assert_eq!(
        root.apply(ObjectPath::Transport, Property::IsMuted, RawValue::Bool(true)),
        Err(DeviceError::Locate(LocateError::UnknownProperty {
            path: ObjectPath::Transport,
            property: Property::IsMuted
        }))
    );
    assert_eq!(
        root.apply(ObjectPath::Track(5), Property::IsMuted, RawValue::Bool(true)),
        Err(DeviceError::Locate(LocateError::TrackMissing(5)))
    );
    assert_eq!(binder.dispatch(&root).notifications, 0);

    assert_eq!(
        root.apply(ObjectPath::Fx(0, 0), Property::Name, RawValue::from("Pro-Q 3")),
        Ok(true)
    );
    binder.dispatch(&root);
    assert_eq!(binder.sink().last("track1Fx1Name"), Some(text("Pro-Q 3")));
}
