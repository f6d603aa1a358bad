//! Integration tests: end-to-end pointer sequences through the public API.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use jellyfx_core::{
    ChannelId, GestureState, HapticKind, HighlightCallbacks, HighlightConfig, HighlightTracker,
    JellyConfig, JellySnapshot, Point, PressCallbacks, PressEngine, Rect, ScaleMode, Size,
};

const FRAME: Duration = Duration::from_millis(16);
const ELEMENT: Size = Size::new(120.0, 48.0);

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Tap,
    LongTap,
    Haptic(HapticKind),
    Changed(Option<usize>),
    Selected(usize),
}

type Log = Rc<RefCell<Vec<Event>>>;

fn press_engine(config: JellyConfig) -> (PressEngine, Log) {
    let log: Log = Rc::default();
    let (a, b, c) = (log.clone(), log.clone(), log.clone());
    let callbacks = PressCallbacks::new()
        .on_tap(move || a.borrow_mut().push(Event::Tap))
        .on_long_tap(move || b.borrow_mut().push(Event::LongTap))
        .on_haptic(move |k| c.borrow_mut().push(Event::Haptic(k)));
    let engine = PressEngine::new(config, || ELEMENT, callbacks).unwrap();
    (engine, log)
}

fn frames(engine: &mut PressEngine, n: usize) {
    for _ in 0..n {
        engine.tick(FRAME);
    }
}

fn settle(engine: &mut PressEngine) -> usize {
    let mut n = 0;
    while engine.needs_tick() && n < 5000 {
        engine.tick(FRAME);
        n += 1;
    }
    n
}

#[test]
fn quick_tap_fires_tap_only() {
    let (mut engine, log) = press_engine(JellyConfig::default());
    let p = Point::new(60.0, 24.0);
    engine.on_pointer_down(p);
    frames(&mut engine, 2);
    engine.on_pointer_up(p);
    settle(&mut engine);
    assert_eq!(*log.borrow(), vec![Event::Tap]);
    assert_eq!(engine.snapshot(), JellySnapshot::REST);
}

#[test]
fn long_hold_fires_long_tap_only() {
    let (mut engine, log) = press_engine(JellyConfig::default());
    let p = Point::new(60.0, 24.0);
    engine.on_pointer_down(p);
    frames(&mut engine, 40);
    engine.on_pointer_up(p);
    settle(&mut engine);
    assert_eq!(
        *log.borrow(),
        vec![Event::Haptic(HapticKind::Medium), Event::LongTap]
    );
}

#[test]
fn custom_long_press_duration_is_honored() {
    let config = JellyConfig::default().with_long_press_duration(Duration::from_millis(200));
    let (mut engine, log) = press_engine(config);
    engine.on_pointer_down(Point::new(10.0, 10.0));
    frames(&mut engine, 12); // 192ms
    assert!(log.borrow().is_empty());
    frames(&mut engine, 1); // 208ms
    assert_eq!(log.borrow().last(), Some(&Event::LongTap));
}

#[test]
fn drag_stretches_and_release_springs_back() {
    let (mut engine, log) = press_engine(JellyConfig::default());
    engine.on_pointer_down(Point::new(20.0, 24.0));
    frames(&mut engine, 5);
    engine.on_pointer_move(Point::new(100.0, 28.0));
    let during = engine.snapshot();
    assert!(during.deform_x > 1.0 && during.deform_y < 1.0);
    assert!(during.shift_x > 0.0);
    assert!((during.deform_x * during.deform_y - 1.0).abs() < 1e-3);

    engine.on_pointer_up(Point::new(100.0, 28.0));
    assert_eq!(engine.state(), GestureState::Idle);
    assert_eq!(engine.last_end(), Some(GestureState::Released));

    // The elastic spring overshoots rest on its way back.
    let mut min_deform_x = f64::MAX;
    while engine.needs_tick() {
        engine.tick(FRAME);
        min_deform_x = min_deform_x.min(engine.snapshot().deform_x);
    }
    assert!(min_deform_x < 1.0, "expected a bounce, min {min_deform_x}");
    assert_eq!(engine.snapshot(), JellySnapshot::REST);
    assert_eq!(*log.borrow(), vec![Event::Tap]);
}

#[test]
fn press_scale_overshoots_then_settles() {
    let (mut engine, _) = press_engine(JellyConfig::default().with_scale_mode(ScaleMode::Slight));
    engine.on_pointer_down(Point::new(5.0, 5.0));
    let max = (0..60)
        .map(|_| {
            engine.tick(FRAME);
            engine.snapshot().scale
        })
        .fold(f64::MIN, f64::max);
    // Underdamped press spring: overshoot past 1.05 before settling.
    assert!(max > 1.05);
    assert!((engine.channels()[ChannelId::Scale].value() - 1.05).abs() < 1e-3);
}

#[test]
fn dispose_mid_animation_then_tick_is_harmless() {
    let (mut engine, log) = press_engine(JellyConfig::default());
    engine.on_pointer_down(Point::new(60.0, 24.0));
    frames(&mut engine, 3);
    let frozen = engine.snapshot();
    engine.dispose();
    frames(&mut engine, 100);
    engine.on_pointer_up(Point::new(60.0, 24.0));
    assert_eq!(engine.snapshot(), frozen);
    assert!(log.borrow().is_empty());
}

// ── Highlight tracker ───────────────────────────────────────────────────

fn nav_bar() -> Vec<Rect> {
    (0..3_i32)
        .map(|i| Rect::new(f64::from(i) * 80.0, 0.0, 80.0, 56.0))
        .collect()
}

#[test]
fn highlight_zero_to_two_selects_two() {
    let log: Log = Rc::default();
    let (a, b) = (log.clone(), log.clone());
    let callbacks = HighlightCallbacks::new()
        .on_highlight_changed(move |i| a.borrow_mut().push(Event::Changed(i)))
        .on_selected(move |i| b.borrow_mut().push(Event::Selected(i)));
    let mut tracker = HighlightTracker::new(HighlightConfig::default(), nav_bar, callbacks);

    tracker.on_pointer_down(Point::new(40.0, 28.0));
    tracker.on_pointer_move(Point::new(200.0, 28.0));
    let selected = tracker.on_pointer_up(Point::new(200.0, 28.0));

    assert_eq!(selected, Some(2));
    assert_eq!(
        *log.borrow(),
        vec![
            Event::Changed(Some(0)),
            Event::Changed(Some(2)),
            Event::Selected(2)
        ]
    );

    tracker.tick(Duration::from_millis(200));
    assert_eq!(tracker.highlighted(), None);
    assert_eq!(log.borrow().last(), Some(&Event::Changed(None)));
}

#[test]
fn custom_grace_window() {
    let config = HighlightConfig::default().with_grace_window(Duration::from_millis(50));
    let mut tracker = HighlightTracker::new(config, nav_bar, HighlightCallbacks::new());
    tracker.on_pointer_down(Point::new(100.0, 10.0));
    tracker.on_pointer_cancel();
    tracker.tick(Duration::from_millis(49));
    assert_eq!(tracker.highlighted(), Some(1));
    tracker.tick(Duration::from_millis(1));
    assert_eq!(tracker.highlighted(), None);
}
