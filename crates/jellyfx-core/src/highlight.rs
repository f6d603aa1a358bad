#![forbid(unsafe_code)]

//! Drag-to-highlight tracking over a row of item rectangles.
//!
//! A navigation bar feeds the same pointer stream it gives its press engine
//! into a [`HighlightTracker`]. The tracker hit-tests every event against the
//! host's current item rects and reports which item is under the pointer.
//!
//! The bar's overall bounds are the union of the item rects. A pointer in a
//! gap between items is still inside the bar and keeps the current
//! highlight; only leaving the bar hides it.
//!
//! There are two indices. `visible` is what the host should paint right now;
//! `highlighted` is the logical highlight, which survives a short grace
//! window after the pointer leaves the bar (or the drag ends) so that a
//! pointer returning within the window resumes without a new gesture.
//!
//! # Invariants
//!
//! 1. `highlighted` is `Some` only while dragging, or within the grace window
//!    after the pointer left the bar or the drag ended.
//! 2. `on_highlight_changed` fires only when `visible` changes.
//! 3. A new pointer down always cancels a pending clear. A down that misses
//!    every item clears any leftover highlight at once and starts no drag.

use std::time::Duration;

use crate::callback::{HapticCallback, HapticKind, IndexCallback, SelectCallback, run_guarded};
use crate::config::HighlightConfig;
use crate::geometry::{Point, Rect};
// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::{debug, trace};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace};
use crate::timer::{TimerQueue, TimerToken};

/// Host-owned item geometry, queried on every pointer event.
pub trait ItemRects {
    fn item_rects(&self) -> Vec<Rect>;
}

impl<F: Fn() -> Vec<Rect>> ItemRects for F {
    fn item_rects(&self) -> Vec<Rect> {
        self()
    }
}

/// Callbacks registered once at construction.
#[derive(Default)]
pub struct HighlightCallbacks {
    on_highlight_changed: Option<IndexCallback>,
    on_selected: Option<SelectCallback>,
    on_haptic: Option<HapticCallback>,
}

impl std::fmt::Debug for HighlightCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightCallbacks")
            .field("on_highlight_changed", &self.on_highlight_changed.is_some())
            .field("on_selected", &self.on_selected.is_some())
            .field("on_haptic", &self.on_haptic.is_some())
            .finish()
    }
}

impl HighlightCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the new visible highlight, `None` when it clears.
    #[must_use]
    pub fn on_highlight_changed(mut self, f: impl FnMut(Option<usize>) + 'static) -> Self {
        self.on_highlight_changed = Some(Box::new(f));
        self
    }

    /// Called when a pointer up lands on the highlighted item.
    #[must_use]
    pub fn on_selected(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_selected = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_haptic(mut self, f: impl FnMut(HapticKind) + 'static) -> Self {
        self.on_haptic = Some(Box::new(f));
        self
    }
}

/// Resolves the pointer against item rectangles during a drag.
pub struct HighlightTracker {
    config: HighlightConfig,
    items: Box<dyn ItemRects>,
    callbacks: HighlightCallbacks,
    timers: TimerQueue<()>,
    clear_timer: Option<TimerToken>,
    highlighted: Option<usize>,
    visible: Option<usize>,
    dragging: bool,
    callback_failures: u64,
    disposed: bool,
}

impl std::fmt::Debug for HighlightTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightTracker")
            .field("highlighted", &self.highlighted)
            .field("visible", &self.visible)
            .field("dragging", &self.dragging)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl HighlightTracker {
    #[must_use]
    pub fn new(
        config: HighlightConfig,
        items: impl ItemRects + 'static,
        callbacks: HighlightCallbacks,
    ) -> Self {
        Self {
            config,
            items: Box::new(items),
            callbacks,
            timers: TimerQueue::new(),
            clear_timer: None,
            highlighted: None,
            visible: None,
            dragging: false,
            callback_failures: 0,
            disposed: false,
        }
    }

    /// Logical highlight, including the grace window.
    #[inline]
    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Highlight the host should paint now.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> Option<usize> {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a deferred clear is waiting for ticks.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        !self.disposed && self.timers.has_pending()
    }

    #[inline]
    #[must_use]
    pub fn callback_failures(&self) -> u64 {
        self.callback_failures
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Index of the first item rect containing `pos`.
    #[must_use]
    pub fn hit_test(&self, pos: Point) -> Option<usize> {
        first_containing(&self.items.item_rects(), pos)
    }

    pub fn on_pointer_down(&mut self, pos: Point) {
        if self.disposed {
            return;
        }
        self.timers.cancel_slot(&mut self.clear_timer);

        let Some(index) = self.hit_test(pos) else {
            trace!("pointer down outside every item");
            self.dragging = false;
            self.apply_clear();
            return;
        };
        debug!(index, "highlight drag started");
        self.dragging = true;
        self.highlighted = Some(index);
        let changed = self.visible != Some(index);
        self.visible = Some(index);

        self.emit_haptic(HapticKind::Medium);
        if changed {
            self.emit_changed(Some(index));
        }
    }

    pub fn on_pointer_move(&mut self, pos: Point) {
        if self.disposed || !self.dragging {
            return;
        }
        let rects = self.items.item_rects();
        match first_containing(&rects, pos) {
            Some(index) if self.visible != Some(index) => {
                trace!(index, "highlight moved");
                self.timers.cancel_slot(&mut self.clear_timer);
                self.highlighted = Some(index);
                self.visible = Some(index);
                self.emit_haptic(HapticKind::Light);
                self.emit_changed(Some(index));
            }
            None if self.visible.is_some() && !bar_contains(&rects, pos) => {
                trace!("pointer left the bar");
                self.visible = None;
                self.schedule_clear();
                self.emit_changed(None);
            }
            _ => {}
        }
    }

    /// Ends the drag. Returns the selected index when the pointer is released
    /// over the current highlight.
    pub fn on_pointer_up(&mut self, pos: Point) -> Option<usize> {
        if self.disposed || !self.dragging {
            return None;
        }
        self.dragging = false;
        let selected = self.hit_test(pos).filter(|&i| self.highlighted == Some(i));
        self.schedule_clear();
        if let Some(index) = selected {
            debug!(index, "highlight selected");
            self.emit_selected(index);
        }
        selected
    }

    pub fn on_pointer_cancel(&mut self) {
        if self.disposed || !self.dragging {
            return;
        }
        self.dragging = false;
        self.schedule_clear();
    }

    /// Advance the grace-window clock and apply any due clear.
    pub fn tick(&mut self, dt: Duration) {
        if self.disposed {
            return;
        }
        self.timers.advance(dt);
        while let Some((token, ())) = self.timers.pop_due() {
            if self.clear_timer != Some(token) {
                continue;
            }
            self.clear_timer = None;
            self.apply_clear();
        }
    }

    /// Cancel the pending clear and refuse all further events. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.timers.cancel_all();
        self.clear_timer = None;
        self.dragging = false;
        debug!("highlight tracker disposed");
    }

    // -- Internals -----------------------------------------------------------

    fn schedule_clear(&mut self) {
        self.timers.cancel_slot(&mut self.clear_timer);
        self.clear_timer = Some(self.timers.schedule((), self.config.grace_window));
    }

    fn apply_clear(&mut self) {
        if self.dragging && self.visible.is_some() {
            return;
        }
        trace!(highlighted = ?self.highlighted, "clearing highlight");
        self.highlighted = None;
        if self.visible.take().is_some() {
            self.emit_changed(None);
        }
    }

    fn emit_changed(&mut self, index: Option<usize>) {
        if let Some(cb) = self.callbacks.on_highlight_changed.as_mut()
            && !run_guarded("on_highlight_changed", || cb(index))
        {
            self.callback_failures += 1;
        }
    }

    fn emit_selected(&mut self, index: usize) {
        if let Some(cb) = self.callbacks.on_selected.as_mut()
            && !run_guarded("on_selected", || cb(index))
        {
            self.callback_failures += 1;
        }
    }

    fn emit_haptic(&mut self, kind: HapticKind) {
        if let Some(cb) = self.callbacks.on_haptic.as_mut()
            && !run_guarded("on_haptic", || cb(kind))
        {
            self.callback_failures += 1;
        }
    }
}

fn first_containing(rects: &[Rect], pos: Point) -> Option<usize> {
    rects.iter().position(|rect| rect.contains(pos))
}

/// Whether `pos` lies within the union of the non-empty item rects.
fn bar_contains(rects: &[Rect], pos: Point) -> bool {
    rects
        .iter()
        .filter(|rect| !rect.is_empty())
        .copied()
        .reduce(|bar, rect| bar.union(&rect))
        .is_some_and(|bar| bar.contains(pos))
}
