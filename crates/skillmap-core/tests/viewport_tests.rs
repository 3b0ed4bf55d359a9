//! Viewport behaviour under sequences of interactions

use skillmap_core::{
    Dispatcher, InputEvent, Point2, Session, UserRecord, ViewportManager, ViewportMode,
    ViewportSize, VisualConfig,
};

fn viewport() -> ViewportManager {
    ViewportManager::new(VisualConfig::default(), ViewportSize::new(1280.0, 720.0)).unwrap()
}

#[test]
fn test_pivot_stays_fixed_across_zoom_sequence() {
    let mut vp = viewport();
    let steps = [
        (-120.0, Point2::new(100.0, 80.0)),
        (240.0, Point2::new(900.0, 650.0)),
        (-30.0, Point2::new(640.0, 360.0)),
        (-800.0, Point2::new(0.0, 0.0)),
        (55.5, Point2::new(1279.0, 1.0)),
    ];
    for (delta, pivot) in steps {
        let under = vp.unmap_point(pivot);
        vp.zoom_at(delta, pivot);
        let back = vp.map_point(under);
        assert!(
            back.distance(&pivot) < 1e-6,
            "delta {} moved pivot {:?} to {:?}",
            delta,
            pivot,
            back
        );
    }
}

#[test]
fn test_scale_never_leaves_bounds() {
    let mut vp = viewport();
    let (min, max) = (vp.config().min_scale, vp.config().max_scale);
    for i in 0..500 {
        let delta = if i % 7 < 4 { -400.0 } else { 650.0 };
        vp.zoom_at(delta, Point2::new(10.0 * i as f64, 5.0));
        assert!(vp.scale() >= min && vp.scale() <= max, "scale {}", vp.scale());
    }
}

#[test]
fn test_animation_converges_to_target() {
    let mut vp = viewport();
    let points = [
        Point2::new(0.2, -0.4),
        Point2::new(0.6, 0.1),
        Point2::new(-1.5, 1.0),
    ];
    vp.zoom_at(-200.0, Point2::new(300.0, 300.0));
    vp.pan(-40.0, 25.0);

    vp.focus_on(points[1], &points, 5_000.0);
    let target = vp.state().animation.unwrap().target;

    let mut previous = vp.transform().scale;
    let mut t = 5_000.0;
    while vp.mode() == ViewportMode::Animating {
        t += 16.0;
        let transform = vp.get_transform(Some(t));
        // Eased interpolation is monotonic between start and target.
        let expected_direction = (target.scale - previous).signum();
        assert!(
            (transform.scale - previous) * expected_direction >= -1e-12,
            "scale went backwards at t={}",
            t
        );
        previous = transform.scale;
    }
    assert!(t >= 5_000.0 + vp.config().focus_duration_ms);
    assert_eq!(vp.transform(), target);
}

#[test]
fn test_dispatched_session_round_trip() {
    let mut session =
        Session::new(VisualConfig::default(), ViewportSize::new(800.0, 600.0)).unwrap();
    session
        .load_users(vec![
            UserRecord::new("a", "a").with_skill("rust", 5.0).with_company("Acme"),
            UserRecord::new("b", "b").with_skill("rust", 4.0).with_company("Acme"),
            UserRecord::new("c", "c").with_skill("go", 5.0),
            UserRecord::new("d", "d").with_skill("go", 1.0).with_skill("c", 3.0),
        ])
        .unwrap();

    let mut dispatcher = Dispatcher::new();
    let target = session.viewport().map_point(session.points()[2]);
    let events = [
        InputEvent::Wheel { delta: -50.0, x: 400.0, y: 300.0 },
        InputEvent::Drag { dx: 12.0, dy: -8.0 },
        InputEvent::Frame { now: 16.0 },
    ];
    for event in events {
        dispatcher.handle(&mut session, event);
    }

    // Target moved with the zoom and drag; click where it is now.
    let now_at = session.viewport().map_point(session.points()[2]);
    assert!(now_at.distance(&target) > 1.0);
    dispatcher.handle(
        &mut session,
        InputEvent::Click { x: now_at.x, y: now_at.y, now: 32.0 },
    );
    assert_eq!(dispatcher.hovered(), Some(2));
    assert_eq!(session.viewport().mode(), ViewportMode::Animating);

    // Input during the animation is dropped.
    let mid = session.viewport().transform();
    assert!(!session.viewport_mut().pan(5.0, 5.0));
    dispatcher.handle(&mut session, InputEvent::Wheel { delta: -10.0, x: 0.0, y: 0.0 });
    assert_eq!(session.viewport().transform(), mid);

    dispatcher.handle(&mut session, InputEvent::Frame { now: 2_000.0 });
    assert_eq!(session.viewport().mode(), ViewportMode::Idle);
    let centred = session.viewport().map_point(session.points()[2]);
    assert!(centred.distance(&Point2::new(400.0, 300.0)) < 1e-6);
}
