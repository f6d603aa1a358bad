//! Fixed-step replay of a [`Script`] into a [`Trace`].
//!
//! Pointer steps are applied at the current replay time without advancing
//! it. `wait` steps advance time in `frame_ms` frames (the last frame may be
//! shorter) and record one [`FrameRecord`] per frame. Callback invocations
//! are recorded as [`EventRecord`]s stamped with the time they fired.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use jellyfx_core::{
    GestureState, HapticKind, HighlightCallbacks, HighlightTracker, JellySnapshot, Point,
    PressCallbacks, PressEngine, Size,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::error::Result;
use crate::script::{Script, Step};

/// Frames ticked after the last step before giving up on settling.
pub const MAX_SETTLE_FRAMES: u32 = 10_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FrameRecord {
    pub t_ms: u64,
    pub state: GestureState,
    pub snapshot: JellySnapshot,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub highlighted: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    Tap,
    LongTap,
    Haptic { kind: HapticKind },
    HighlightChanged { index: Option<usize> },
    Selected { index: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    pub t_ms: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// One JSONL line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEntry {
    Frame(FrameRecord),
    Event(EventRecord),
}

/// Aggregate counts over a trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub frames: usize,
    pub duration_ms: u64,
    pub taps: usize,
    pub long_taps: usize,
    pub haptics: usize,
    pub selections: Vec<usize>,
    pub settled: bool,
    pub final_snapshot: JellySnapshot,
    pub callback_failures: u64,
}

/// Chronological record of one replay.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    pub entries: Vec<TraceEntry>,
    pub settled: bool,
    pub callback_failures: u64,
}

impl Trace {
    pub fn frames(&self) -> impl Iterator<Item = &FrameRecord> {
        self.entries.iter().filter_map(|e| match e {
            TraceEntry::Frame(f) => Some(f),
            TraceEntry::Event(_) => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &EventRecord> {
        self.entries.iter().filter_map(|e| match e {
            TraceEntry::Event(ev) => Some(ev),
            TraceEntry::Frame(_) => None,
        })
    }

    /// Event kinds in firing order, without timestamps.
    #[must_use]
    pub fn event_kinds(&self) -> Vec<EventKind> {
        self.events().map(|e| e.kind).collect()
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let kinds = self.event_kinds();
        let count = |pred: fn(&EventKind) -> bool| kinds.iter().filter(|k| pred(k)).count();
        Summary {
            frames: self.frames().count(),
            duration_ms: self.frames().last().map_or(0, |f| f.t_ms),
            taps: count(|k| matches!(k, EventKind::Tap)),
            long_taps: count(|k| matches!(k, EventKind::LongTap)),
            haptics: count(|k| matches!(k, EventKind::Haptic { .. })),
            selections: kinds
                .iter()
                .filter_map(|k| match k {
                    EventKind::Selected { index } => Some(*index),
                    _ => None,
                })
                .collect(),
            settled: self.settled,
            final_snapshot: self
                .frames()
                .last()
                .map_or(JellySnapshot::REST, |f| f.snapshot),
            callback_failures: self.callback_failures,
        }
    }

    /// Write one JSON object per line.
    pub fn write_jsonl<W: Write>(&self, mut out: W) -> Result<()> {
        for entry in &self.entries {
            serde_json::to_writer(&mut out, entry)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

type Sink = Rc<RefCell<Vec<EventKind>>>;

/// Drives one press engine and an optional highlight tracker through a script.
pub struct Replay {
    frame: Duration,
    now: Duration,
    engine: PressEngine,
    tracker: Option<HighlightTracker>,
    sink: Sink,
    trace: Trace,
}

impl Replay {
    /// Replay `script` from start to finish.
    pub fn run(script: &Script) -> Result<Trace> {
        script.validate()?;
        let span = info_span!("replay", steps = script.steps.len(), frame_ms = script.frame_ms);
        let _guard = span.enter();

        let mut replay = Self::new(script)?;
        for step in &script.steps {
            replay.apply(*step);
        }
        if script.settle {
            replay.settle();
        } else {
            replay.trace.settled = !replay.needs_tick();
        }
        Ok(replay.finish())
    }

    fn new(script: &Script) -> Result<Self> {
        let sink: Sink = Rc::default();
        let element: Size = script.element;

        let (tap, long_tap, haptic) = (sink.clone(), sink.clone(), sink.clone());
        let callbacks = PressCallbacks::new()
            .on_tap(move || tap.borrow_mut().push(EventKind::Tap))
            .on_long_tap(move || long_tap.borrow_mut().push(EventKind::LongTap))
            .on_haptic(move |kind| haptic.borrow_mut().push(EventKind::Haptic { kind }));
        let engine = PressEngine::new(script.config.jelly_config(), move || element, callbacks)?;

        let tracker = if script.items.is_empty() {
            None
        } else {
            let items = script.items.clone();
            let (changed, selected, haptic) = (sink.clone(), sink.clone(), sink.clone());
            let callbacks = HighlightCallbacks::new()
                .on_highlight_changed(move |index| {
                    changed
                        .borrow_mut()
                        .push(EventKind::HighlightChanged { index });
                })
                .on_selected(move |index| selected.borrow_mut().push(EventKind::Selected { index }))
                .on_haptic(move |kind| haptic.borrow_mut().push(EventKind::Haptic { kind }));
            Some(HighlightTracker::new(
                script.config.highlight_config(),
                move || items.clone(),
                callbacks,
            ))
        };

        Ok(Self {
            frame: script.frame(),
            now: Duration::ZERO,
            engine,
            tracker,
            sink,
            trace: Trace::default(),
        })
    }

    fn apply(&mut self, step: Step) {
        debug!(?step, t_ms = self.t_ms(), "replay step");
        match step {
            Step::Down { x, y } => {
                let pos = Point::new(x, y);
                self.engine.on_pointer_down(pos);
                if let Some(t) = self.tracker.as_mut() {
                    t.on_pointer_down(pos);
                }
            }
            Step::Move { x, y } => {
                let pos = Point::new(x, y);
                self.engine.on_pointer_move(pos);
                if let Some(t) = self.tracker.as_mut() {
                    t.on_pointer_move(pos);
                }
            }
            Step::Up { x, y } => {
                let pos = Point::new(x, y);
                self.engine.on_pointer_up(pos);
                if let Some(t) = self.tracker.as_mut() {
                    t.on_pointer_up(pos);
                }
            }
            Step::Cancel => {
                self.engine.on_pointer_cancel();
                if let Some(t) = self.tracker.as_mut() {
                    t.on_pointer_cancel();
                }
            }
            Step::Wait { ms } => {
                let mut remaining = Duration::from_millis(ms);
                while !remaining.is_zero() {
                    let dt = remaining.min(self.frame);
                    self.tick(dt);
                    remaining -= dt;
                }
            }
        }
        self.drain_events();
    }

    fn tick(&mut self, dt: Duration) {
        self.now += dt;
        self.engine.tick(dt);
        if let Some(t) = self.tracker.as_mut() {
            t.tick(dt);
        }
        self.drain_events();
        self.trace.entries.push(TraceEntry::Frame(FrameRecord {
            t_ms: self.t_ms(),
            state: self.engine.state(),
            snapshot: self.engine.snapshot(),
            highlighted: self.tracker.as_ref().and_then(HighlightTracker::visible),
        }));
    }

    fn needs_tick(&self) -> bool {
        self.engine.needs_tick() || self.tracker.as_ref().is_some_and(HighlightTracker::needs_tick)
    }

    fn settle(&mut self) {
        let mut frames = 0;
        while self.needs_tick() {
            if frames == MAX_SETTLE_FRAMES {
                warn!(frames, "replay did not settle");
                self.trace.settled = false;
                return;
            }
            self.tick(self.frame);
            frames += 1;
        }
        self.trace.settled = true;
    }

    fn drain_events(&mut self) {
        let t_ms = self.t_ms();
        let drained: Vec<EventKind> = self.sink.borrow_mut().drain(..).collect();
        self.trace
            .entries
            .extend(drained.into_iter().map(|kind| TraceEntry::Event(EventRecord { t_ms, kind })));
    }

    fn t_ms(&self) -> u64 {
        u64::try_from(self.now.as_millis()).unwrap_or(u64::MAX)
    }

    fn finish(mut self) -> Trace {
        self.trace.callback_failures = self.engine.callback_failures()
            + self
                .tracker
                .as_ref()
                .map_or(0, HighlightTracker::callback_failures);
        info!(
            entries = self.trace.entries.len(),
            settled = self.trace.settled,
            "replay finished"
        );
        self.trace
    }
}
