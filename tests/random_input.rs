//! Invariants under long random input sequences.

use std::collections::HashSet;

use polymet::{Dashboard, DashboardConfig, Message, SyntheticSamples, TimelineMessage};
use polymet_ui::{Handle, Point, PointerEvent, MAX_POLYGON_VERTICES, MIN_POLYGON_VERTICES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_point(rng: &mut StdRng) -> Point {
    Point::new(rng.random_range(-100.0..900.0), rng.random_range(-100.0..700.0))
}

fn random_message(rng: &mut StdRng, dashboard: &Dashboard) -> Message {
    let position = random_point(rng);
    match rng.random_range(0..14) {
        0..=4 => Message::Pointer(PointerEvent::Click { position }),
        5 => Message::Pointer(PointerEvent::DoubleClick { position }),
        6 => Message::Pointer(PointerEvent::Down { position }),
        7 => Message::Pointer(PointerEvent::Move { position }),
        8 => Message::Pointer(PointerEvent::Up { position }),
        9 => Message::ToggleDraw,
        10 => {
            let handle = if rng.random() { Handle::Lower } else { Handle::Upper };
            Message::Timeline(TimelineMessage::DragStart { handle })
        }
        11 => Message::Timeline(TimelineMessage::DragMove {
            fraction: rng.random_range(-0.5..1.5),
        }),
        12 => Message::Timeline(TimelineMessage::DragEnd),
        _ => match dashboard.canvas().polygons().first() {
            Some(polygon) if rng.random_range(0..4) == 0 => Message::DeletePolygon(polygon.id()),
            _ => Message::ResetView,
        },
    }
}

fn assert_invariants(dashboard: &Dashboard) {
    let canvas = dashboard.canvas();

    let mut ids = HashSet::new();
    for polygon in canvas.polygons() {
        let n = polygon.vertices().len();
        assert!(
            (MIN_POLYGON_VERTICES..=MAX_POLYGON_VERTICES).contains(&n),
            "polygon {} has {} vertices",
            polygon.id(),
            n
        );
        assert!(ids.insert(polygon.id()), "duplicate id {}", polygon.id());
    }
    assert!(canvas.draw_state().vertices().len() < MAX_POLYGON_VERTICES);

    let timeline = dashboard.timeline();
    let (lo, hi) = (timeline.lower(), timeline.upper());
    assert!(lo >= 0.0);
    assert!(lo < hi);
    assert!(hi <= timeline.domain_max());
    assert!(hi - lo >= 1.0, "gap {} below minimum", hi - lo);
}

#[test]
fn random_input_preserves_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut config = DashboardConfig::default();
    config.samples.seed = Some(1);
    let mut dashboard = Dashboard::from_config(config).unwrap();
    let mut source = SyntheticSamples::seeded(2);

    for _ in 0..5000 {
        let message = random_message(&mut rng, &dashboard);
        dashboard.update(message);
        dashboard.pump(&mut source);
        assert_invariants(&dashboard);

        // With every request resolved, samples match the committed width
        let width = dashboard.timeline().committed().unit_count();
        for polygon in dashboard.canvas().polygons() {
            assert_eq!(polygon.samples().len(), width);
        }
        assert!(!dashboard.canvas().has_pending_samples());
    }

    assert!(!dashboard.canvas().polygons().is_empty());
}
